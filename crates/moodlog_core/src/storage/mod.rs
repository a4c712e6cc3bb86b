//! Key-value slot storage and mood list persistence helpers.
//!
//! # Responsibility
//! - Define the `KeyValueStore` contract used as the durability backend.
//! - Provide SQLite and in-memory backends.
//! - Encode/decode the mood list document stored in the journal slot.
//!
//! # Invariants
//! - `read` distinguishes absent (`Ok(None)`) from failure (`Err`).
//! - Backends store values verbatim; they never interpret the document.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory_kv;
pub mod persistence;
mod sqlite_kv;

pub use memory_kv::MemoryKeyValueStore;
pub use persistence::{load_entries, save_entries, LoadOutcome, STORAGE_KEY};
pub use sqlite_kv::SqliteKeyValueStore;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure of a storage read/write or of the stored document itself.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Stored value is not a valid mood document.
    Decode(serde_json::Error),
    Encode(serde_json::Error),
    /// Backend cannot be reached (e.g. poisoned lock, injected outage).
    Unavailable(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Decode(err) => write!(f, "malformed stored mood data: {err}"),
            Self::Encode(err) => write!(f, "failed to encode mood data: {err}"),
            Self::Unavailable(message) => write!(f, "storage unavailable: {message}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Decode(err) | Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl StorageError {
    /// Stable short code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Db(_) => "storage_db",
            Self::Decode(_) => "storage_decode",
            Self::Encode(_) => "storage_encode",
            Self::Unavailable(_) => "storage_unavailable",
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Platform-provided persistent slot storage.
///
/// `MoodStore` moves its backend onto the persistence writer thread, so
/// backends handed to it must also be `Send`.
pub trait KeyValueStore {
    fn read(&self, key: &str) -> StorageResult<Option<String>>;
    fn write(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}
