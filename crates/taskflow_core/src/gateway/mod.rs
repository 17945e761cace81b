//! Durable state gateway.
//!
//! # Responsibility
//! - Define the `load` / `save` boundary the task store persists through.
//! - Provide SQLite slot storage and an in-memory implementation.
//!
//! # Invariants
//! - A gateway stores exactly one persisted snapshot per storage key.
//! - `load` returns `Ok(None)` for a slot that was never written.

use crate::codec::{CodecError, PersistedState};
use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway-level failure for loading or saving a snapshot.
#[derive(Debug)]
pub enum GatewayError {
    Db(DbError),
    Codec(CodecError),
    /// Backend refused the operation (e.g. simulated write failure).
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Codec(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for GatewayError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<CodecError> for GatewayError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

impl From<rusqlite::Error> for GatewayError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Persistence boundary used by `TaskStore`.
pub trait StateGateway {
    /// Reads the last saved snapshot, if any.
    fn load(&self) -> GatewayResult<Option<PersistedState>>;
    /// Replaces the saved snapshot.
    fn save(&self, snapshot: &PersistedState) -> GatewayResult<()>;
}
