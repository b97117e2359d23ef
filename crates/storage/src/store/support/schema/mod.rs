#![forbid(unsafe_code)]

mod sql;

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};

pub(in crate::store) const SCHEMA_VERSION: &str = "1";

/// Creates any missing tables and indexes and stamps the schema version.
pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&sql::full_schema_sql())?;

    let recorded: Option<String> = conn
        .query_row(
            "SELECT value FROM meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()?;

    match recorded.as_deref() {
        None => {
            conn.execute(
                "INSERT INTO meta(key, value) VALUES (?1, ?2)",
                params!["schema_version", SCHEMA_VERSION],
            )?;
            tracing::info!(version = SCHEMA_VERSION, "schema installed");
        }
        Some(SCHEMA_VERSION) => {}
        Some(other) => {
            tracing::warn!(found = other, expected = SCHEMA_VERSION, "unexpected schema version");
            return Err(StoreError::InvalidInput("unsupported schema version"));
        }
    }
    Ok(())
}
