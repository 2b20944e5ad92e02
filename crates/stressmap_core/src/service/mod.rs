//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate geometry, marker state and persistence into use-case APIs.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod history_service;
pub mod marker_store;
pub mod report;
pub mod stress_map_service;
