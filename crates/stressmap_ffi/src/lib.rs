//! Flutter bridge surface for the stress map engine.

pub mod api;
