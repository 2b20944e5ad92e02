//! Marker cache slot contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the complete marker collection (both sides) as one JSON array.
//! - Restore that collection on startup.
//!
//! # Invariants
//! - Writes overwrite the single `markers` slot; nothing is appended.
//! - Restores drop individual markers that fail validation and keep the rest.
//! - A payload that is not a JSON array is reported as invalid data.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::marker::Marker;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Fixed key of the marker cache slot.
pub const MARKER_SLOT_KEY: &str = "markers";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for local cache persistence.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    Serialization(serde_json::Error),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "marker payload encoding failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid cached marker data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// Single-slot store for the full marker collection.
pub trait MarkerCache {
    /// Returns `None` when the slot has never been written.
    fn load(&self) -> RepoResult<Option<Vec<Marker>>>;
    /// Overwrites the slot with `markers`.
    fn store(&self, markers: &[Marker]) -> RepoResult<()>;
}

/// SQLite-backed marker cache owning its connection.
pub struct SqliteMarkerCache {
    conn: Connection,
}

impl SqliteMarkerCache {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens (or creates) the cache database at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    pub fn in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl MarkerCache for SqliteMarkerCache {
    fn load(&self) -> RepoResult<Option<Vec<Marker>>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM cache_slots WHERE slot_key = ?1;",
                [MARKER_SLOT_KEY],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        payload.map(|text| decode_markers(&text)).transpose()
    }

    fn store(&self, markers: &[Marker]) -> RepoResult<()> {
        let payload = serde_json::to_string(markers)?;
        self.conn.execute(
            "INSERT INTO cache_slots (slot_key, payload, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![MARKER_SLOT_KEY, payload],
        )?;
        Ok(())
    }
}

/// Decodes a cached payload, skipping markers that no longer validate.
pub fn decode_markers(payload: &str) -> RepoResult<Vec<Marker>> {
    let value: serde_json::Value = serde_json::from_str(payload)?;
    let serde_json::Value::Array(items) = value else {
        return Err(RepoError::InvalidData(
            "marker slot payload is not a JSON array".to_string(),
        ));
    };

    let total = items.len();
    let mut markers = Vec::with_capacity(total);
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Marker>(item) {
            Ok(marker) => markers.push(marker),
            Err(err) => {
                warn!("event=cache_restore module=repo status=skip index={index} error={err}");
            }
        }
    }

    if markers.len() != total {
        warn!(
            "event=cache_restore module=repo status=partial kept={} dropped={}",
            markers.len(),
            total - markers.len()
        );
    }
    Ok(markers)
}
