use std::path::Path;

use rusqlite::{Connection as SqliteConnection, OptionalExtension, params};
use rusqlite_migration::{M, Migrations};
use serde::{Serialize, de::DeserializeOwned};

use crate::{config::ConnectionConfig, history::HistoryEntry};

/// Key of the saved connection parameters
pub const CONFIG_KEY: &str = "connection_config";
/// Key of the saved query history
pub const HISTORY_KEY: &str = "query_history";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Storage migration error: {0}")]
    Migration(#[from] rusqlite_migration::Error),
    #[error("Invalid stored value: {0}")]
    Json(#[from] serde_json::Error),
}

/// Small key/value store holding JSON blobs, one row per key
pub struct LocalStore {
    conn: SqliteConnection,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("path", &self.conn.path())
            .finish()
    }
}

fn migrations() -> Migrations<'static> {
    Migrations::new(vec![
        M::up(
            "CREATE TABLE IF NOT EXISTS local_storage (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL
            );",
        )
        .down("DROP TABLE local_storage"),
    ])
}

impl LocalStore {
    /// Open the store at `path`, creating and migrating it as needed.
    ///
    /// # Errors
    ///
    /// This function will return an error if the database cannot be opened or if migrations fail.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut conn = SqliteConnection::open(path)?;
        migrations().to_latest(&mut conn)?;
        tracing::debug!(path = %path.display(), "Opened local store");
        Ok(Self { conn })
    }

    /// A store that lives only as long as the value
    ///
    /// # Errors
    ///
    /// This function will return an error if migrations fail.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut conn = SqliteConnection::open_in_memory()?;
        migrations().to_latest(&mut conn)?;
        Ok(Self { conn })
    }

    /// Raw JSON text stored under `key`
    ///
    /// # Errors
    ///
    /// This function will return an error if the query fails.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Store raw JSON text under `key`, replacing what was there
    ///
    /// # Errors
    ///
    /// This function will return an error if the query fails.
    pub fn set_raw(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// Decode the value under `key`
    ///
    /// # Errors
    ///
    /// Fails if the query fails or the stored text is not valid for `T`.
    pub fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        self.get_raw(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Encode `value` as JSON and store it under `key`
    ///
    /// # Errors
    ///
    /// This function will return an error if the query fails.
    pub fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set_raw(key, &raw)
    }

    /// The saved connection parameters, if a connect ever succeeded
    #[must_use]
    pub fn load_config(&self) -> Option<ConnectionConfig> {
        self.get(CONFIG_KEY).unwrap_or_else(|e| {
            tracing::warn!("Ignoring stored connection config: {e}");
            None
        })
    }

    /// # Errors
    ///
    /// This function will return an error if the query fails.
    pub fn save_config(
        &self,
        config: &ConnectionConfig,
    ) -> Result<(), StoreError> {
        self.set(CONFIG_KEY, config)
    }

    /// The saved history, newest first; empty when missing or unreadable
    #[must_use]
    pub fn load_history(&self) -> Vec<HistoryEntry> {
        self.get(HISTORY_KEY)
            .unwrap_or_else(|e| {
                tracing::warn!("Ignoring stored query history: {e}");
                None
            })
            .unwrap_or_default()
    }

    /// # Errors
    ///
    /// This function will return an error if the query fails.
    pub fn save_history(
        &self,
        entries: &[HistoryEntry],
    ) -> Result<(), StoreError> {
        self.set(HISTORY_KEY, entries)
    }
}
