//! Report composition for export.
//!
//! # Responsibility
//! - Aggregate markers and protocol lookups into an export-ready `Report`.
//! - Define the renderer seam used by hosts to turn a report into an image.
//!
//! # Invariants
//! - Reports are derived data and are never persisted.
//! - `aggregate_load` always equals the intensity sum of the input markers.
//! - At most `MAX_SUGGESTED_REGIONS` distinct regions carry suggestions.

use crate::catalog::{ProtocolCatalog, Suggestion};
use crate::model::marker::{Marker, Quality};
use crate::model::region::{RegionId, Side};
use crate::service::marker_store::aggregate_load;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Maximum number of distinct regions listed with a suggestion.
pub const MAX_SUGGESTED_REGIONS: usize = 3;

/// One marker as shown in a report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub region_id: RegionId,
    pub region_label: String,
    pub side: Side,
    pub intensity: u8,
    pub quality: Quality,
    pub note: Option<String>,
}

/// Primary suggestion for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSuggestion {
    pub region_id: RegionId,
    pub suggestion: Suggestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unix epoch milliseconds.
    pub generated_at: i64,
    pub entries: Vec<ReportEntry>,
    pub aggregate_load: u32,
    pub top_suggestions_by_region: Vec<RegionSuggestion>,
}

/// Builds a report from markers in their collection order.
pub fn build(markers: &[Marker], catalog: &ProtocolCatalog, generated_at: i64) -> Report {
    let entries = markers
        .iter()
        .map(|marker| ReportEntry {
            region_id: marker.region_id,
            region_label: marker.region_label.clone(),
            side: marker.side,
            intensity: marker.intensity.get(),
            quality: marker.quality,
            note: marker.note.clone(),
        })
        .collect();

    let mut seen: Vec<RegionId> = Vec::with_capacity(MAX_SUGGESTED_REGIONS);
    let mut top_suggestions_by_region = Vec::with_capacity(MAX_SUGGESTED_REGIONS);
    for marker in markers {
        if seen.len() == MAX_SUGGESTED_REGIONS {
            break;
        }
        if seen.contains(&marker.region_id) {
            continue;
        }
        seen.push(marker.region_id);
        if let Some(suggestion) = catalog.primary(marker.region_id) {
            top_suggestions_by_region.push(RegionSuggestion {
                region_id: marker.region_id,
                suggestion: suggestion.clone(),
            });
        }
    }

    Report {
        generated_at,
        entries,
        aggregate_load: aggregate_load(markers),
        top_suggestions_by_region,
    }
}

/// Image payload produced by an export renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportPayload {
    Bytes(Vec<u8>),
    Uri(String),
}

/// Failure reported by an export renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderError {
    pub message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "report render failed: {}", self.message)
    }
}

impl Error for RenderError {}

/// Host-provided collaborator that rasterizes a report.
pub trait ReportRenderer {
    fn render(&self, report: &Report) -> Result<ExportPayload, RenderError>;
}
