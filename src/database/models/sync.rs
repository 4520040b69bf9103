use sqlx::FromRow;

/// One source row of the parcel join, as pushed to the RPIS side.
#[derive(Debug, Clone, FromRow)]
pub struct ParcelRow {
    pub id: i32,
    pub pin: String,
    pub bounds: Option<f64>,
    pub computed_area: Option<f64>,
}

/// Stored connection credentials for a schema's RPIS counterpart.
/// Historical table shape: every column nullable, port kept as text.
#[derive(Debug, Clone, FromRow)]
pub struct SyncCreds {
    pub id: i32,
    pub host: Option<String>,
    pub port: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
}
