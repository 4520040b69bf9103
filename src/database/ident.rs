use thiserror::Error;

/// Schemas that must never be listed or targeted by sync operations.
pub const SYSTEM_SCHEMAS: &[&str] = &[
    "information_schema",
    "pg_catalog",
    "pg_toast",
    "public",
    "credentials_login",
    "auth",
    "storage",
    "vault",
    "graphql",
    "graphql_public",
    "realtime",
    "extensions",
    "pgbouncer",
    "postgres",
    "credentials_users_schema",
];

#[derive(Debug, Error)]
#[error("Invalid identifier '{name}': {reason}")]
pub struct InvalidIdent {
    pub name: String,
    pub reason: &'static str,
}

impl InvalidIdent {
    fn new(name: &str, reason: &'static str) -> Self {
        Self { name: name.to_string(), reason }
    }
}

/// Validate a client-supplied schema name before it is ever interpolated.
/// Identifier shape only, and never a system or credential schema.
pub fn validate_schema_name(name: &str) -> Result<(), InvalidIdent> {
    if name.is_empty() {
        return Err(InvalidIdent::new(name, "empty name"));
    }
    if name.len() > 63 {
        return Err(InvalidIdent::new(name, "longer than 63 bytes"));
    }
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return Err(InvalidIdent::new(name, "must start with a letter or underscore")),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(InvalidIdent::new(name, "only letters, digits and underscores allowed"));
    }

    let lowered = name.to_ascii_lowercase();
    if lowered.starts_with("pg_") {
        return Err(InvalidIdent::new(name, "reserved prefix"));
    }
    if lowered.contains("credential") {
        return Err(InvalidIdent::new(name, "reserved name"));
    }
    if SYSTEM_SCHEMAS.contains(&lowered.as_str()) {
        return Err(InvalidIdent::new(name, "system schema"));
    }
    Ok(())
}

/// Validate a column name reported by a remote catalog. Laxer than schema
/// validation (PostgreSQL allows nearly anything inside quotes) but still
/// bounded and free of control characters.
pub fn validate_column_name(name: &str) -> Result<(), InvalidIdent> {
    if name.is_empty() {
        return Err(InvalidIdent::new(name, "empty name"));
    }
    if name.len() > 63 {
        return Err(InvalidIdent::new(name, "longer than 63 bytes"));
    }
    if name.chars().any(|c| c.is_control()) {
        return Err(InvalidIdent::new(name, "control character"));
    }
    Ok(())
}

/// Quote a SQL identifier, doubling any embedded quotes.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Schema-qualified, quoted table reference.
pub fn qualify(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_municipal_schemas() {
        assert!(validate_schema_name("dagupan_city").is_ok());
        assert!(validate_schema_name("san_fabian").is_ok());
        assert!(validate_schema_name("_scratch").is_ok());
        assert!(validate_schema_name("Urdaneta2").is_ok());
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(validate_schema_name("").is_err());
        assert!(validate_schema_name("9ine").is_err());
        assert!(validate_schema_name("bad-name").is_err());
        assert!(validate_schema_name("has space").is_err());
        assert!(validate_schema_name("x\"; DROP SCHEMA x").is_err());
        assert!(validate_schema_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn rejects_system_and_credential_schemas() {
        assert!(validate_schema_name("pg_catalog").is_err());
        assert!(validate_schema_name("pg_anything").is_err());
        assert!(validate_schema_name("public").is_err());
        assert!(validate_schema_name("credentials_login").is_err());
        assert!(validate_schema_name("my_credentials").is_err());
        assert!(validate_schema_name("Information_Schema").is_err());
    }

    #[test]
    fn column_validation_is_laxer() {
        assert!(validate_column_name("Registered Owner").is_ok());
        assert!(validate_column_name("geom").is_ok());
        assert!(validate_column_name("").is_err());
        assert!(validate_column_name("bad\ncolumn").is_err());
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quote_ident("simple"), "\"simple\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
        assert_eq!(qualify("dagupan_city", "JoinedTable"), "\"dagupan_city\".\"JoinedTable\"");
    }
}
