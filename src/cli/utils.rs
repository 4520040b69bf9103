// Output helpers shared by the CLI commands.

use crate::cli::OutputFormat;
use serde_json::{json, Value};

/// Print a success result in the requested format.
///
/// Text mode prints the message (plus pretty JSON details when present);
/// JSON mode wraps everything in a `{"success": true, ...}` envelope.
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Text => {
            println!("✓ {}", message);
            if let Some(data) = data {
                println!("{}", serde_json::to_string_pretty(&data)?);
            }
        }
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message,
            });
            if let (Some(Value::Object(extra)), Some(obj)) = (data, response.as_object_mut()) {
                obj.extend(extra);
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}

/// Print an error result in the requested format.
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Text => {
            eprintln!("✗ {}", message);
        }
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "error": message,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }
    Ok(())
}
