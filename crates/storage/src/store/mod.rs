#![forbid(unsafe_code)]

mod anchors;
mod attachments;
mod entries;
mod error;
mod graph;
mod instructions;
mod items;
mod notes;
mod outline;
mod readings;
mod rubric;
mod support;
mod tags;
mod tags_merge;
mod todos;
mod types;

pub use error::StoreError;
pub use types::*;

use crate::config::StoreConfig;
use rusqlite::{Connection, Transaction, params};
use std::path::{Path, PathBuf};

/// Handle over the single reading-tracker database.
///
/// Every multi-statement write runs in one transaction through [`SqliteStore::write`]; reads go
/// straight to the connection and return owned rows.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    storage_dir: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_config(&StoreConfig::for_dir(storage_dir))
    }

    pub fn open_with_config(config: &StoreConfig) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&config.storage_dir)?;

        let db_path = config.db_path();
        let conn = Connection::open(&db_path)?;
        conn.busy_timeout(config.busy_timeout())?;

        let store = Self::from_connection(conn, Some(config.storage_dir.clone()))?;
        tracing::debug!(path = %db_path.display(), "store opened");
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?, None)
    }

    fn from_connection(conn: Connection, storage_dir: Option<PathBuf>) -> Result<Self, StoreError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        support::install_schema(&conn)?;
        Ok(Self { conn, storage_dir })
    }

    /// `None` for in-memory stores.
    pub fn storage_dir(&self) -> Option<&Path> {
        self.storage_dir.as_deref()
    }

    /// Writes a consistent snapshot of the database to `dest`, which must not exist yet.
    pub fn backup_to(&self, dest: impl AsRef<Path>) -> Result<(), StoreError> {
        let dest = dest.as_ref();
        if dest.exists() {
            return Err(StoreError::InvalidInput("backup destination already exists"));
        }
        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let dest_text = dest
            .to_str()
            .ok_or(StoreError::InvalidInput("backup path must be valid UTF-8"))?;
        self.conn.execute("VACUUM INTO ?1", params![dest_text])?;
        tracing::info!(dest = %dest.display(), "database backed up");
        Ok(())
    }

    /// Runs `body` in a transaction: commit on success, roll back, log and re-raise otherwise.
    fn write<T>(
        &mut self,
        op: &'static str,
        body: impl FnOnce(&Transaction<'_>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let tx = self.conn.transaction()?;
        let outcome = match body(&tx) {
            Ok(value) => tx.commit().map(|()| value).map_err(StoreError::from),
            Err(err) => {
                drop(tx);
                Err(err)
            }
        };
        if let Err(err) = &outcome {
            tracing::warn!(op, error = %err, "transaction rolled back");
        }
        outcome
    }
}
