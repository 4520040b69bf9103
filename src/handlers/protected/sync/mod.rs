// handlers/protected/sync/mod.rs - JoinedTable sync endpoints

pub mod config;
pub mod pull;
pub mod push;

pub use config::{get_sync_config, post_sync_config};
pub use pull::pull;
pub use push::push;

use crate::error::ApiError;

/// The schema field is required on every sync request.
pub(crate) fn require_schema(value: Option<&str>) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        _ => Err(ApiError::bad_request("Schema is required.")),
    }
}

pub(crate) fn require_field(value: Option<&str>) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(ApiError::bad_request("Missing required fields")),
    }
}
