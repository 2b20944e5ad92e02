//! Domain model for the body stress map.
//!
//! # Responsibility
//! - Define regions, markers and history records shared by every layer.
//! - Keep wire names stable for cache and history payloads.
//!
//! # Invariants
//! - Regions are derived data and are never persisted.
//! - Markers are validated on construction and on decode.

pub mod history;
pub mod marker;
pub mod region;
