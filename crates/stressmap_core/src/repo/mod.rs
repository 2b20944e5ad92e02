//! Local persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the marker cache slot contract used for write-through mirroring.
//! - Isolate SQL and JSON payload details from service orchestration.
//!
//! # Invariants
//! - The cache holds exactly one slot; every write replaces it whole.
//! - Read paths never hand out markers that fail validation.

pub mod marker_cache;
