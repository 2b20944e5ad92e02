//! Remote history record shapes.
//!
//! # Responsibility
//! - Define the payload submitted on commit (`HistoryDraft`).
//! - Define the persisted row read back from history (`HistoryEntry`).
//!
//! # Invariants
//! - History is append-only; core never mutates an entry once stored.
//! - `id` and `server_timestamp` are assigned by the store, never by core.

use crate::model::marker::{Intensity, Marker, Quality};
use crate::model::region::{RegionId, Side};
use serde::{Deserialize, Serialize};

/// One submission row built from a marker on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryDraft {
    pub region: RegionId,
    pub x: f64,
    pub y: f64,
    pub intensity: Intensity,
    pub quality: Quality,
    pub side: Side,
    pub note: Option<String>,
}

impl From<&Marker> for HistoryDraft {
    fn from(marker: &Marker) -> Self {
        Self {
            region: marker.region_id,
            x: marker.x,
            y: marker.y,
            intensity: marker.intensity,
            quality: marker.quality,
            side: marker.side,
            note: marker.note.clone(),
        }
    }
}

/// One persisted history row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Store-assigned identifier.
    pub id: i64,
    pub region: RegionId,
    pub x: f64,
    pub y: f64,
    pub intensity: Intensity,
    pub quality: Quality,
    pub side: Side,
    pub note: Option<String>,
    /// Unix epoch milliseconds assigned by the store.
    pub server_timestamp: i64,
}
