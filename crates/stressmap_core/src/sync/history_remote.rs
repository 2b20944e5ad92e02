//! Remote history contract and bundled SQLite ledger.
//!
//! # Responsibility
//! - Define the append-only submission/fetch seam for historical check-ins.
//! - Provide a SQLite ledger implementing that seam for local hosts and tests.
//!
//! # Invariants
//! - Submissions are appended, never merged or de-duplicated.
//! - A submission batch is stored atomically.
//! - Entry ids and timestamps are assigned by the store.

use crate::db::{open_db, DbError};
use crate::model::history::{HistoryDraft, HistoryEntry};
use crate::model::marker::{Intensity, Quality};
use crate::model::region::{RegionId, Side};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure talking to a history store.
#[derive(Debug)]
pub enum RemoteError {
    /// Store could not be reached or rejected the request.
    Unavailable(String),
    Db(DbError),
    InvalidData(String),
}

impl Display for RemoteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "history store unavailable: {message}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid history data: {message}"),
        }
    }
}

impl Error for RemoteError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RemoteError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RemoteError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Append-only history endpoint (`POST entries[]` / `GET`).
pub trait HistoryRemote {
    /// Appends `entries`; returns how many rows were accepted.
    fn submit(&self, entries: &[HistoryDraft]) -> RemoteResult<usize>;
    /// Returns every stored entry, newest first.
    fn fetch_all(&self) -> RemoteResult<Vec<HistoryEntry>>;
}

/// SQLite-backed history ledger.
pub struct SqliteHistoryLedger {
    conn: Connection,
}

impl SqliteHistoryLedger {
    /// Wraps a connection that already has migrations applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn open(path: impl AsRef<Path>) -> RemoteResult<Self> {
        Ok(Self::new(open_db(path)?))
    }
}

impl HistoryRemote for SqliteHistoryLedger {
    fn submit(&self, entries: &[HistoryDraft]) -> RemoteResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO history_entries (
                    region,
                    x,
                    y,
                    intensity,
                    quality,
                    side,
                    note
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            )?;
            for entry in entries {
                stmt.execute(params![
                    entry.region.as_str(),
                    entry.x,
                    entry.y,
                    i64::from(entry.intensity.get()),
                    entry.quality.as_str(),
                    entry.side.as_str(),
                    entry.note.as_deref(),
                ])?;
            }
        }
        tx.commit()?;
        Ok(entries.len())
    }

    fn fetch_all(&self) -> RemoteResult<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT
                id,
                region,
                x,
                y,
                intensity,
                quality,
                side,
                note,
                server_timestamp
             FROM history_entries
             ORDER BY server_timestamp DESC, id DESC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_history_row(row)?);
        }
        Ok(entries)
    }
}

fn parse_history_row(row: &Row<'_>) -> RemoteResult<HistoryEntry> {
    let region_text: String = row.get("region")?;
    let region = RegionId::parse(&region_text).ok_or_else(|| {
        RemoteError::InvalidData(format!(
            "invalid region `{region_text}` in history_entries.region"
        ))
    })?;

    let quality_text: String = row.get("quality")?;
    let quality = Quality::parse(&quality_text).ok_or_else(|| {
        RemoteError::InvalidData(format!(
            "invalid quality `{quality_text}` in history_entries.quality"
        ))
    })?;

    let side_text: String = row.get("side")?;
    let side = Side::parse(&side_text).ok_or_else(|| {
        RemoteError::InvalidData(format!("invalid side `{side_text}` in history_entries.side"))
    })?;

    let intensity = Intensity::new(row.get("intensity")?)
        .map_err(|err| RemoteError::InvalidData(err.to_string()))?;

    Ok(HistoryEntry {
        id: row.get("id")?,
        region,
        x: row.get("x")?,
        y: row.get("y")?,
        intensity,
        quality,
        side,
        note: row.get("note")?,
        server_timestamp: row.get("server_timestamp")?,
    })
}
