//! Coordinate spaces and conversions.
//!
//! # Responsibility
//! - Map display-space pointer positions into canonical board space.
//! - Convert board points to and from resolution-independent normalized
//!   coordinates.
//!
//! # Invariants
//! - Board space is fixed at `BOARD_WIDTH x BOARD_HEIGHT` regardless of the
//!   host display size.
//! - Normalized coordinates never depend on display size.

use serde::{Deserialize, Serialize};

/// Canonical board width in board units.
pub const BOARD_WIDTH: f64 = 320.0;
/// Canonical board height in board units.
pub const BOARD_HEIGHT: f64 = 640.0;

/// Point in host display space (pixels, logical points, ...).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

/// Rectangle the board is currently drawn into, in display space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayBounds {
    pub fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
        }
    }

    /// Bounds with origin at zero.
    pub fn sized(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    fn is_usable(&self) -> bool {
        self.origin_x.is_finite()
            && self.origin_y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
}

/// Point in canonical board space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoardPoint {
    pub x: f64,
    pub y: f64,
}

impl BoardPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: BoardPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Point expressed as fractions of board width/height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

/// Maps a display point into board space.
///
/// Returns `None` when `bounds` has a non-positive or non-finite size.
pub fn to_board_space(point: DisplayPoint, bounds: DisplayBounds) -> Option<BoardPoint> {
    if !bounds.is_usable() {
        return None;
    }
    let sx = BOARD_WIDTH / bounds.width;
    let sy = BOARD_HEIGHT / bounds.height;
    Some(BoardPoint {
        x: (point.x - bounds.origin_x) * sx,
        y: (point.y - bounds.origin_y) * sy,
    })
}

/// Maps a board point back into display space; inverse of [`to_board_space`].
pub fn to_display_space(point: BoardPoint, bounds: DisplayBounds) -> Option<DisplayPoint> {
    if !bounds.is_usable() {
        return None;
    }
    Some(DisplayPoint {
        x: bounds.origin_x + point.x * bounds.width / BOARD_WIDTH,
        y: bounds.origin_y + point.y * bounds.height / BOARD_HEIGHT,
    })
}

pub fn to_normalized(point: BoardPoint) -> NormalizedPoint {
    NormalizedPoint {
        x: point.x / BOARD_WIDTH,
        y: point.y / BOARD_HEIGHT,
    }
}

pub fn to_board_from_normalized(point: NormalizedPoint) -> BoardPoint {
    BoardPoint {
        x: point.x * BOARD_WIDTH,
        y: point.y * BOARD_HEIGHT,
    }
}
