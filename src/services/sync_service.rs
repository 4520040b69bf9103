//! GIS <-> RPIS reconciliation for the parcel join table.
//!
//! Both directions work through a staging table on the side being
//! written: rows land in staging first (one batched, parameterized
//! insert), then set-based SQL reconciles staging into the live
//! "JoinedTable" inside a single transaction. Client-supplied schema
//! names are validated before interpolation; row values only ever travel
//! as bind parameters.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;
use sqlx::{Connection, PgConnection, PgPool, Row};
use thiserror::Error;
use tracing::{info, warn};

use crate::config::config;
use crate::database::ident::{qualify, quote_ident, validate_column_name, validate_schema_name, InvalidIdent};
use crate::database::models::{ParcelRow, SyncCreds};

const JOINED_TABLE: &str = "JoinedTable";
const CREDS_TABLE: &str = "SyncCreds";
const PUSH_STAGING: &str = "_push_staging";
const PULL_STAGING: &str = "_rpis_staging";

/// Columns a pull must never overwrite. The GIS side owns these.
const PROTECTED_COLUMNS: &[&str] = &["id", "pin", "bounds", "computed_area", "geom"];

/// PostgreSQL error code for "relation does not exist".
const UNDEFINED_TABLE: &str = "42P01";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{0}")]
    InvalidSchema(String),
    #[error("No SyncCreds found for {0}")]
    CredsMissing(String),
    #[error("Incomplete SyncCreds for {0}: missing {1}")]
    CredsIncomplete(String, &'static str),
    #[error("Invalid port '{1}' in SyncCreds for {0}")]
    InvalidPort(String, String),
    #[error("JoinedTable not found in remote schema {0}")]
    RemoteTableMissing(String),
    #[error("JoinedTable in remote schema {0} has no id column")]
    RemoteIdMissing(String),
    #[error("Unsafe remote column name: {0}")]
    UnsafeColumn(String),
    #[error("Remote connection failed: {0}")]
    RemoteConnect(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<InvalidIdent> for SyncError {
    fn from(err: InvalidIdent) -> Self {
        SyncError::InvalidSchema(err.to_string())
    }
}

/// How pushed rows are matched against the remote table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    #[default]
    Id,
    Pin,
}

impl MatchStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            MatchStrategy::Id => "ID",
            MatchStrategy::Pin => "PIN",
        }
    }
}

/// Result of a push or pull, before it is shaped into a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    Empty { message: String },
    Success { message: String, count: usize },
}

/// Sync operations for one routed province database.
pub struct SyncService {
    pool: PgPool,
    /// Name of the connected database; the RPIS counterpart carries the
    /// same name on its own server.
    database: String,
}

impl SyncService {
    pub fn new(pool: PgPool, database: String) -> Self {
        Self { pool, database }
    }

    /// Latest stored credentials for a schema. `None` when no row exists
    /// or the SyncCreds table has never been created.
    pub async fn latest_creds(&self, schema: &str) -> Result<Option<SyncCreds>, SyncError> {
        validate_schema_name(schema)?;
        let creds_table = qualify(schema, CREDS_TABLE);

        let result = sqlx::query_as::<_, SyncCreds>(&format!(
            "SELECT id, host, port, username, password FROM {creds_table} ORDER BY id DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row),
            Err(e) if is_undefined_table(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Append a credentials row, creating the table on first use. The
    /// newest row wins on lookup, so saving is never an update.
    pub async fn save_creds(
        &self,
        schema: &str,
        host: &str,
        port: &str,
        username: &str,
        password: Option<&str>,
    ) -> Result<(), SyncError> {
        validate_schema_name(schema)?;
        let creds_table = qualify(schema, CREDS_TABLE);

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {creds_table} (\
                id SERIAL PRIMARY KEY, host TEXT, port TEXT, username TEXT, password TEXT)"
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "INSERT INTO {creds_table} (host, port, username, password) VALUES ($1, $2, $3, $4)"
        ))
        .bind(host)
        .bind(port)
        .bind(username)
        .bind(password)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        info!("Saved sync credentials for schema '{}'", schema);
        Ok(())
    }

    /// Push the parcel join to the RPIS side.
    ///
    /// Source rows are read outside any remote work; all remote mutations
    /// (staging build + reconcile) commit as one transaction, so a failed
    /// push leaves the remote untouched.
    pub async fn push(&self, schema: &str, strategy: MatchStrategy) -> Result<SyncOutcome, SyncError> {
        validate_schema_name(schema)?;
        let joined = qualify(schema, JOINED_TABLE);
        let staging = qualify(schema, PUSH_STAGING);

        let rows: Vec<ParcelRow> = sqlx::query_as(&format!(
            "SELECT id, pin, bounds, computed_area FROM {joined} WHERE pin IS NOT NULL"
        ))
        .fetch_all(&self.pool)
        .await?;

        if rows.is_empty() {
            return Ok(SyncOutcome::Empty {
                message: "No data found in JoinedTable".to_string(),
            });
        }

        let mut remote = self.connect_remote(schema).await?;
        let mut tx = remote.begin().await?;

        sqlx::query(&format!("DROP TABLE IF EXISTS {staging}")).execute(&mut *tx).await?;
        sqlx::query(&format!(
            "CREATE TABLE {staging} (\
                id INTEGER, pin TEXT, bounds DOUBLE PRECISION, computed_area DOUBLE PRECISION)"
        ))
        .execute(&mut *tx)
        .await?;

        // One batched insert; four parallel arrays, nullable where the
        // source columns are.
        let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
        let pins: Vec<String> = rows.iter().map(|r| r.pin.clone()).collect();
        let bounds: Vec<Option<f64>> = rows.iter().map(|r| r.bounds).collect();
        let areas: Vec<Option<f64>> = rows.iter().map(|r| r.computed_area).collect();

        sqlx::query(&format!(
            "INSERT INTO {staging} (id, pin, bounds, computed_area) \
             SELECT * FROM UNNEST($1::INTEGER[], $2::TEXT[], $3::DOUBLE PRECISION[], $4::DOUBLE PRECISION[])"
        ))
        .bind(&ids)
        .bind(&pins)
        .bind(&bounds)
        .bind(&areas)
        .execute(&mut *tx)
        .await?;

        match strategy {
            MatchStrategy::Id => {
                // Authoritative replacement: remote rows missing from the
                // source are dropped.
                sqlx::query(&format!(
                    "DELETE FROM {joined} WHERE id NOT IN (SELECT id FROM {staging})"
                ))
                .execute(&mut *tx)
                .await?;

                sqlx::query(&format!(
                    "UPDATE {joined} AS live \
                     SET pin = staging.pin, bounds = staging.bounds, computed_area = staging.computed_area \
                     FROM {staging} AS staging WHERE live.id = staging.id"
                ))
                .execute(&mut *tx)
                .await?;

                sqlx::query(&format!(
                    "INSERT INTO {joined} (id, pin, bounds, computed_area) \
                     SELECT s.id, s.pin, s.bounds, s.computed_area FROM {staging} AS s \
                     WHERE NOT EXISTS (SELECT 1 FROM {joined} AS t WHERE t.id = s.id)"
                ))
                .execute(&mut *tx)
                .await?;
            }
            MatchStrategy::Pin => {
                // Upsert by natural key; never deletes, never touches id
                // on conflict.
                sqlx::query(&format!(
                    "INSERT INTO {joined} (id, pin, bounds, computed_area) \
                     SELECT s.id, s.pin, s.bounds, s.computed_area FROM {staging} AS s \
                     ON CONFLICT (pin) DO UPDATE \
                     SET bounds = EXCLUDED.bounds, computed_area = EXCLUDED.computed_area"
                ))
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query(&format!("DROP TABLE IF EXISTS {staging}")).execute(&mut *tx).await?;
        tx.commit().await?;

        let count = rows.len();
        info!(
            "Pushed {} rows from '{}'.'{}' using {} match",
            count, self.database, schema, strategy.label()
        );
        Ok(SyncOutcome::Success {
            message: format!("Pushed {} records successfully using {} match.", count, strategy.label()),
            count,
        })
    }

    /// Pull RPIS-side columns back into the GIS table, matching on id.
    ///
    /// Every remote column rides along as JSON; the staging table mirrors
    /// the live table so the batch lands with native types, and the final
    /// update skips the protected columns.
    pub async fn pull(&self, schema: &str) -> Result<SyncOutcome, SyncError> {
        validate_schema_name(schema)?;
        let joined = qualify(schema, JOINED_TABLE);
        let staging = qualify(schema, PULL_STAGING);

        let mut remote = self.connect_remote(schema).await?;

        // ::text because these columns are name-typed in the catalog
        let columns: Vec<(String, String)> = sqlx::query_as(
            "SELECT column_name::text, udt_name::text FROM information_schema.columns \
             WHERE table_schema = $1 AND table_name = $2 ORDER BY ordinal_position",
        )
        .bind(schema)
        .bind(JOINED_TABLE)
        .fetch_all(&mut remote)
        .await?;

        if columns.is_empty() {
            return Err(SyncError::RemoteTableMissing(schema.to_string()));
        }
        if !columns.iter().any(|(name, _)| name == "id") {
            return Err(SyncError::RemoteIdMissing(schema.to_string()));
        }
        for (name, _) in &columns {
            validate_column_name(name).map_err(|e| SyncError::UnsafeColumn(e.to_string()))?;
        }

        let updatable = updatable_columns(&columns);
        if updatable.is_empty() {
            return Ok(SyncOutcome::Empty {
                message: "No updatable columns in remote JoinedTable".to_string(),
            });
        }

        let fetch_sql = format!(
            "SELECT row_to_json(t) AS row FROM (SELECT {} FROM {} WHERE id IS NOT NULL) AS t",
            select_list(&columns),
            joined
        );
        let fetched = sqlx::query(&fetch_sql).fetch_all(&mut remote).await?;
        let mut payload = Vec::with_capacity(fetched.len());
        for row in fetched {
            payload.push(row.try_get::<serde_json::Value, _>("row")?);
        }

        if payload.is_empty() {
            return Ok(SyncOutcome::Empty {
                message: "No rows found in RPIS JoinedTable".to_string(),
            });
        }
        let staged = payload.len();

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {staging} (LIKE {joined} INCLUDING ALL)"
        ))
        .execute(&mut *tx)
        .await?;
        sqlx::query(&format!("TRUNCATE {staging}")).execute(&mut *tx).await?;

        // The staging table's row type drives json_populate_recordset:
        // unknown keys from the remote are dropped, absent ones land NULL.
        sqlx::query(&format!(
            "INSERT INTO {staging} SELECT * FROM json_populate_recordset(NULL::{staging}, $1::json)"
        ))
        .bind(serde_json::Value::Array(payload))
        .execute(&mut *tx)
        .await?;

        let set_list = updatable
            .iter()
            .map(|c| {
                let q = quote_ident(c);
                format!("{q} = staging.{q}")
            })
            .collect::<Vec<_>>()
            .join(", ");
        sqlx::query(&format!(
            "UPDATE {joined} AS gis SET {set_list} \
             FROM {staging} AS staging WHERE gis.id = staging.id"
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!("TRUNCATE {staging}")).execute(&mut *tx).await?;
        tx.commit().await?;

        info!("Pulled {} rows into '{}'.'{}'", staged, self.database, schema);
        Ok(SyncOutcome::Success {
            message: format!("Pulled {} records successfully using ID match.", staged),
            count: staged,
        })
    }

    /// Open a direct connection to the schema's RPIS counterpart using the
    /// latest stored credentials. The remote database carries the same
    /// name as the routed source database.
    async fn connect_remote(&self, schema: &str) -> Result<PgConnection, SyncError> {
        let creds = self
            .latest_creds(schema)
            .await?
            .ok_or_else(|| SyncError::CredsMissing(schema.to_string()))?;

        let host = non_empty(creds.host)
            .ok_or_else(|| SyncError::CredsIncomplete(schema.to_string(), "host"))?;
        let username = non_empty(creds.username)
            .ok_or_else(|| SyncError::CredsIncomplete(schema.to_string(), "username"))?;
        let port_raw = non_empty(creds.port)
            .ok_or_else(|| SyncError::CredsIncomplete(schema.to_string(), "port"))?;
        let port: u16 = port_raw
            .parse()
            .map_err(|_| SyncError::InvalidPort(schema.to_string(), port_raw.clone()))?;

        let mut options = PgConnectOptions::new()
            .host(&host)
            .port(port)
            .username(&username)
            .database(&self.database);
        if let Some(password) = creds.password.as_deref() {
            options = options.password(password);
        }

        let timeout = Duration::from_secs(config().sync.remote_connect_timeout);
        match tokio::time::timeout(timeout, PgConnection::connect_with(&options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                warn!("Remote connect to {}:{} failed: {}", host, port, e);
                Err(SyncError::RemoteConnect(e.to_string()))
            }
            Err(_) => Err(SyncError::RemoteConnect(format!(
                "connection to {}:{} timed out after {}s",
                host,
                port,
                timeout.as_secs()
            ))),
        }
    }
}

/// Remote columns minus the protected set, in catalog order.
fn updatable_columns(columns: &[(String, String)]) -> Vec<String> {
    columns
        .iter()
        .map(|(name, _)| name.clone())
        .filter(|name| !PROTECTED_COLUMNS.contains(&name.as_str()))
        .collect()
}

/// Select list for the remote fetch. Spatial types ride as text so their
/// EWKB form survives the JSON round trip.
fn select_list(columns: &[(String, String)]) -> String {
    columns
        .iter()
        .map(|(name, udt)| {
            let q = quote_ident(name);
            match udt.as_str() {
                "geometry" | "geography" => format!("{q}::text AS {q}"),
                _ => q,
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn is_undefined_table(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some(UNDEFINED_TABLE)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[(&str, &str)]) -> Vec<(String, String)> {
        names.iter().map(|(n, u)| (n.to_string(), u.to_string())).collect()
    }

    #[test]
    fn protected_columns_are_excluded() {
        let columns = cols(&[
            ("id", "int4"),
            ("pin", "text"),
            ("owner_name", "text"),
            ("bounds", "float8"),
            ("computed_area", "float8"),
            ("geom", "geometry"),
            ("assessed_value", "numeric"),
        ]);
        assert_eq!(updatable_columns(&columns), vec!["owner_name", "assessed_value"]);
    }

    #[test]
    fn spatial_columns_ride_as_text() {
        let columns = cols(&[("id", "int4"), ("geom", "geometry"), ("shape", "geography")]);
        assert_eq!(
            select_list(&columns),
            "\"id\", \"geom\"::text AS \"geom\", \"shape\"::text AS \"shape\""
        );
    }

    #[test]
    fn match_strategy_wire_format() {
        assert_eq!(serde_json::from_str::<MatchStrategy>("\"id\"").unwrap(), MatchStrategy::Id);
        assert_eq!(serde_json::from_str::<MatchStrategy>("\"pin\"").unwrap(), MatchStrategy::Pin);
        assert!(serde_json::from_str::<MatchStrategy>("\"upsert\"").is_err());
        assert_eq!(MatchStrategy::default(), MatchStrategy::Id);
        assert_eq!(MatchStrategy::Id.label(), "ID");
        assert_eq!(MatchStrategy::Pin.label(), "PIN");
    }

    #[test]
    fn creds_fields_trimmed() {
        assert_eq!(non_empty(Some("  5432 ".into())), Some("5432".to_string()));
        assert_eq!(non_empty(Some("   ".into())), None);
        assert_eq!(non_empty(None), None);
    }
}
