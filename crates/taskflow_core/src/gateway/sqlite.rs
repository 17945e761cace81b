//! SQLite-backed storage slot gateway.
//!
//! # Invariants
//! - One row per key in `storage_slots`; saves upsert in place.
//! - Stored text is always a complete encoded storage document.

use super::{GatewayResult, StateGateway};
use crate::codec::{self, PersistedState, STORAGE_KEY};
use crate::db::{open_db, open_db_in_memory};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Gateway storing the encoded snapshot in one `storage_slots` row.
pub struct SqliteStateGateway {
    conn: Connection,
    key: String,
}

impl SqliteStateGateway {
    /// Wraps a migrated connection using the default storage key.
    pub fn new(conn: Connection) -> Self {
        Self::with_key(conn, STORAGE_KEY)
    }

    /// Wraps a migrated connection using a custom storage key.
    pub fn with_key(conn: Connection, key: impl Into<String>) -> Self {
        Self {
            conn,
            key: key.into(),
        }
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> GatewayResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> GatewayResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the raw stored document text, if the slot exists.
    pub fn raw_document(&self) -> GatewayResult<Option<String>> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM storage_slots WHERE key = ?1;",
                [self.key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }
}

impl StateGateway for SqliteStateGateway {
    fn load(&self) -> GatewayResult<Option<PersistedState>> {
        match self.raw_document()? {
            Some(text) => Ok(Some(codec::decode(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &PersistedState) -> GatewayResult<()> {
        let text = codec::encode(snapshot)?;
        self.conn.execute(
            "INSERT INTO storage_slots (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![self.key.as_str(), text.as_str()],
        )?;
        debug!(
            "event=slot_save module=gateway status=ok key={} bytes={} tasks={}",
            self.key,
            text.len(),
            snapshot.tasks.len()
        );
        Ok(())
    }
}
