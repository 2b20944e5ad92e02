//! Diagnostic marker domain model.
//!
//! # Responsibility
//! - Define the user-placed annotation attached to a body region.
//! - Define the partial update shape applied by the marker store.
//!
//! # Invariants
//! - `id` is a non-nil uuid and never reused.
//! - `x`/`y` are normalized against the board and lie in `[0, 1]`.
//! - `intensity` lies in `1..=10`.
//! - `region_id` is valid for `side`.
//! - Deserialization enforces all of the above.

use crate::model::region::{RegionId, Side};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable marker identifier.
pub type MarkerId = Uuid;

/// Categorical character of a sensation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
    Tight,
    Ache,
    Sharp,
    Numb,
    Tingle,
    Burn,
}

impl Quality {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tight => "tight",
            Self::Ache => "ache",
            Self::Sharp => "sharp",
            Self::Numb => "numb",
            Self::Tingle => "tingle",
            Self::Burn => "burn",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "tight" => Some(Self::Tight),
            "ache" => Some(Self::Ache),
            "sharp" => Some(Self::Sharp),
            "numb" => Some(Self::Numb),
            "tingle" => Some(Self::Tingle),
            "burn" => Some(Self::Burn),
            _ => None,
        }
    }
}

/// Severity on a 1..=10 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Intensity(u8);

impl Intensity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;
    /// Intensity assigned to freshly created markers.
    pub const DEFAULT: Self = Self(5);

    pub fn new(value: i64) -> Result<Self, MarkerValidationError> {
        if value < i64::from(Self::MIN) || value > i64::from(Self::MAX) {
            return Err(MarkerValidationError::IntensityOutOfRange(value));
        }
        Ok(Self(value as u8))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Intensity {
    type Error = MarkerValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Intensity> for u8 {
    fn from(value: Intensity) -> Self {
        value.0
    }
}

/// Validation failures for marker construction and decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum MarkerValidationError {
    NilId,
    IntensityOutOfRange(i64),
    CoordinateOutOfRange { axis: &'static str, value: f64 },
    RegionNotOnSide { region: RegionId, side: Side },
}

impl Display for MarkerValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "marker id must not be nil"),
            Self::IntensityOutOfRange(value) => write!(
                f,
                "intensity ({value}) must be within {}..={}",
                Intensity::MIN,
                Intensity::MAX
            ),
            Self::CoordinateOutOfRange { axis, value } => {
                write!(f, "normalized {axis} ({value}) must be within [0, 1]")
            }
            Self::RegionNotOnSide { region, side } => write!(
                f,
                "region `{}` is not available on the {} view",
                region.as_str(),
                side.as_str()
            ),
        }
    }
}

impl Error for MarkerValidationError {}

/// One diagnostic annotation placed on the body schematic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MarkerRecord")]
pub struct Marker {
    pub id: MarkerId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    pub side: Side,
    pub region_id: RegionId,
    /// Instance label of the region hit at creation ("Left Arm").
    pub region_label: String,
    pub x: f64,
    pub y: f64,
    pub intensity: Intensity,
    pub quality: Quality,
    pub note: Option<String>,
}

impl Marker {
    /// Checks every marker invariant.
    pub fn validate(&self) -> Result<(), MarkerValidationError> {
        if self.id.is_nil() {
            return Err(MarkerValidationError::NilId);
        }
        check_unit_range("x", self.x)?;
        check_unit_range("y", self.y)?;
        if !self.region_id.is_valid_for(self.side) {
            return Err(MarkerValidationError::RegionNotOnSide {
                region: self.region_id,
                side: self.side,
            });
        }
        Ok(())
    }
}

fn check_unit_range(axis: &'static str, value: f64) -> Result<(), MarkerValidationError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(MarkerValidationError::CoordinateOutOfRange { axis, value });
    }
    Ok(())
}

#[derive(Deserialize)]
struct MarkerRecord {
    id: MarkerId,
    created_at: i64,
    side: Side,
    region_id: RegionId,
    region_label: String,
    x: f64,
    y: f64,
    intensity: Intensity,
    quality: Quality,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<MarkerRecord> for Marker {
    type Error = MarkerValidationError;

    fn try_from(record: MarkerRecord) -> Result<Self, Self::Error> {
        let marker = Marker {
            id: record.id,
            created_at: record.created_at,
            side: record.side,
            region_id: record.region_id,
            region_label: record.region_label,
            x: record.x,
            y: record.y,
            intensity: record.intensity,
            quality: record.quality,
            note: record.note,
        };
        marker.validate()?;
        Ok(marker)
    }
}

/// Partial update merged into an existing marker.
///
/// `None` fields are left untouched. A blank `note` clears the note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerPatch {
    pub quality: Option<Quality>,
    pub intensity: Option<Intensity>,
    pub note: Option<String>,
}

impl MarkerPatch {
    /// Merges this patch into `marker`.
    ///
    /// Applying the same patch repeatedly yields the same state.
    pub fn apply_to(&self, marker: &mut Marker) {
        if let Some(quality) = self.quality {
            marker.quality = quality;
        }
        if let Some(intensity) = self.intensity {
            marker.intensity = intensity;
        }
        if let Some(note) = self.note.as_deref() {
            marker.note = normalize_note(note);
        }
    }
}

fn normalize_note(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_note, Intensity, MarkerValidationError};

    #[test]
    fn intensity_rejects_out_of_range_values() {
        assert_eq!(
            Intensity::new(0).unwrap_err(),
            MarkerValidationError::IntensityOutOfRange(0)
        );
        assert!(Intensity::new(11).is_err());
        assert_eq!(Intensity::new(10).unwrap().get(), 10);
    }

    #[test]
    fn blank_note_normalizes_to_none() {
        assert_eq!(normalize_note("   "), None);
        assert_eq!(normalize_note(" calf cramp "), Some("calf cramp".to_string()));
    }
}
