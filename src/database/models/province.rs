use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Registry row mapping a provincial access code to its physical database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Province {
    pub id: i32,
    pub code: String,
    pub database: String,
    pub display_name: Option<String>,
    pub is_active: bool,
}
