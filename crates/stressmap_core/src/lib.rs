//! Core engine for the body stress map.
//! This crate is the single source of truth for region geometry, marker
//! invariants and report aggregation.

pub mod catalog;
pub mod db;
pub mod geometry;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod sync;

pub use catalog::{ProtocolCatalog, Suggestion};
pub use geometry::coords::{
    to_board_from_normalized, to_board_space, to_display_space, to_normalized, BoardPoint,
    DisplayBounds, DisplayPoint, NormalizedPoint, BOARD_HEIGHT, BOARD_WIDTH,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::history::{HistoryDraft, HistoryEntry};
pub use model::marker::{Intensity, Marker, MarkerId, MarkerPatch, MarkerValidationError, Quality};
pub use model::region::{
    CircleGeometry, ProportionPreset, Proportions, RectGeometry, Region, RegionId, RegionShape,
    Side, SideAffinity,
};
pub use repo::marker_cache::{MarkerCache, RepoError, RepoResult, SqliteMarkerCache};
pub use service::history_service::{CommitStatus, HistoryService};
pub use service::marker_store::MarkerStore;
pub use service::report::{ExportPayload, RenderError, Report, ReportEntry, ReportRenderer};
pub use service::stress_map_service::{marker_board_position, PointerOutcome, StressMapService};
pub use sync::history_remote::{HistoryRemote, RemoteError, RemoteResult, SqliteHistoryLedger};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
