//! Board geometry: body schematic generation, coordinate spaces and hit testing.
//!
//! # Responsibility
//! - Keep all geometric computation pure and free of I/O.
//!
//! # Invariants
//! - Every shape and point handled here lives in canonical board space
//!   unless its type says otherwise (`DisplayPoint`, `NormalizedPoint`).

pub mod body;
pub mod coords;
