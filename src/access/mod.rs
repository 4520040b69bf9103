//! Provincial/municipal access rules.
//!
//! A user's directory row carries two nullable text fields:
//! `provincial_access` (a province code routed through the registry) and
//! `municipal_access` (either the wildcard `ALL` or a comma-separated list
//! of municipality names). Everything here is pure string logic so the
//! rules stay testable without a database.

/// Access state derived from the two directory fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessStatus {
    NoAccess,
    PendingApproval,
    Approved,
}

impl AccessStatus {
    pub fn evaluate(provincial: Option<&str>, municipal: Option<&str>) -> Self {
        let has = |v: Option<&str>| v.map(|s| !s.trim().is_empty()).unwrap_or(false);
        if !has(provincial) {
            AccessStatus::NoAccess
        } else if !has(municipal) {
            AccessStatus::PendingApproval
        } else {
            AccessStatus::Approved
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessStatus::NoAccess => "no_access",
            AccessStatus::PendingApproval => "pending_approval",
            AccessStatus::Approved => "approved",
        }
    }

    /// The message shown to a user who cannot proceed. `None` once approved.
    pub fn message(&self) -> Option<&'static str> {
        match self {
            AccessStatus::NoAccess => {
                Some("You do not have access yet. Please contact administrator.")
            }
            AccessStatus::PendingApproval => {
                Some("Your access request is pending approval. Please contact administrator.")
            }
            AccessStatus::Approved => None,
        }
    }
}

/// Municipality names are entered by hand ("Dagupan City") while schemas
/// are identifier-shaped ("dagupan_city"). Comparison happens in the
/// normalized space.
pub fn normalize_schema_name(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .replace(", ", "_")
        .replace(',', "_")
        .replace(' ', "_")
}

fn is_wildcard(municipal: &str) -> bool {
    municipal.trim().eq_ignore_ascii_case("all")
}

/// True when the municipal grant covers the given schema.
pub fn municipal_allows(municipal: &str, schema: &str) -> bool {
    if is_wildcard(municipal) {
        return true;
    }
    let target = normalize_schema_name(schema);
    municipal
        .split(',')
        .map(normalize_schema_name)
        .any(|entry| !entry.is_empty() && entry == target)
}

/// Filter the schema list down to what the municipal grant covers,
/// returning names in normalized form.
pub fn filter_schemas(schemas: Vec<String>, municipal: &str) -> Vec<String> {
    schemas
        .into_iter()
        .filter(|s| municipal_allows(municipal, s))
        .map(|s| normalize_schema_name(&s))
        .collect()
}

/// Human-readable summary for the schema listing response.
pub fn describe_access(provincial: &str, municipal: &str) -> String {
    if is_wildcard(municipal) {
        format!("All municipalities in {}", provincial)
    } else {
        let count = municipal
            .split(',')
            .filter(|e| !e.trim().is_empty())
            .count();
        if count == 1 {
            format!("1 municipality in {}", provincial)
        } else {
            format!("{} municipalities in {}", count, provincial)
        }
    }
}
