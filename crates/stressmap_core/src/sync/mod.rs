//! Remote history synchronization seam.
//!
//! # Responsibility
//! - Define how committed check-ins reach append-only history storage.
//!
//! # Invariants
//! - Nothing in this module mutates the in-memory marker collection.

pub mod history_remote;
