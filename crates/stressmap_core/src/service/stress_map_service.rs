//! Stress map session use-case service.
//!
//! # Responsibility
//! - Drive the pointer → board → region → marker flow for one host session.
//! - Mirror every marker mutation into the local cache slot (write-through).
//! - Hold the active preset/side and the region set generated for them.
//!
//! # Invariants
//! - The cache is restored before the service is handed out.
//! - Every collection mutation (create, update, remove, clear) is followed by
//!   a full-snapshot cache write; cache failures are logged and swallowed.
//! - Region set always equals `body::generate(preset, side)`.
//! - Selection changes are never persisted.

use crate::catalog::{ProtocolCatalog, Suggestion};
use crate::geometry::body;
use crate::geometry::coords::{
    to_board_from_normalized, to_board_space, BoardPoint, DisplayBounds, DisplayPoint,
    NormalizedPoint,
};
use crate::geometry::hit_test;
use crate::model::marker::{Marker, MarkerId, MarkerPatch};
use crate::model::region::{ProportionPreset, Region, RegionId, Side};
use crate::repo::marker_cache::MarkerCache;
use crate::service::marker_store::{now_epoch_ms, MarkerStore};
use crate::service::report::{self, ExportPayload, RenderError, Report, ReportRenderer};
use log::{debug, info, warn};

/// Board-unit radius within which a tap picks an existing marker.
pub const MARKER_PICK_RADIUS: f64 = 12.0;

/// Result of one pointer-down event.
#[derive(Debug, Clone, PartialEq)]
pub enum PointerOutcome {
    /// A new marker was placed and selected.
    Created(Marker),
    /// An existing marker under the pointer was selected.
    Selected(Marker),
    /// Nothing under the pointer; state unchanged.
    Missed,
}

pub struct StressMapService<C: MarkerCache> {
    cache: C,
    catalog: ProtocolCatalog,
    preset: ProportionPreset,
    side: Side,
    regions: Vec<Region>,
    store: MarkerStore,
}

impl<C: MarkerCache> StressMapService<C> {
    /// Creates a session and restores any cached markers into it.
    pub fn open(cache: C, catalog: ProtocolCatalog, preset: ProportionPreset, side: Side) -> Self {
        let mut store = MarkerStore::new();
        match cache.load() {
            Ok(Some(markers)) => {
                info!(
                    "event=session_restore module=service status=ok count={}",
                    markers.len()
                );
                store.replace_all(markers);
            }
            Ok(None) => {
                info!("event=session_restore module=service status=empty");
            }
            Err(err) => {
                warn!("event=session_restore module=service status=error error={err}");
            }
        }

        Self {
            cache,
            catalog,
            preset,
            side,
            regions: body::generate(preset, side),
            store,
        }
    }

    pub fn preset(&self) -> ProportionPreset {
        self.preset
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Regions of the active preset/side in z-order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn set_preset(&mut self, preset: ProportionPreset) {
        if self.preset != preset {
            self.preset = preset;
            self.regenerate();
        }
    }

    pub fn set_side(&mut self, side: Side) {
        if self.side != side {
            self.side = side;
            self.regenerate();
        }
    }

    fn regenerate(&mut self) {
        self.regions = body::generate(self.preset, self.side);
        debug!(
            "event=regions_generate module=service status=ok preset={} side={} count={}",
            self.preset.as_str(),
            self.side.as_str(),
            self.regions.len()
        );
    }

    /// Handles a pointer-down at `point` inside `bounds`.
    ///
    /// Picks an existing marker on the active side first; otherwise places a
    /// new marker on the region under the pointer.
    pub fn pointer_down(&mut self, point: DisplayPoint, bounds: DisplayBounds) -> PointerOutcome {
        let Some(board) = to_board_space(point, bounds) else {
            return PointerOutcome::Missed;
        };

        if let Some(id) = self.pick_marker(board) {
            self.store.select(id);
            if let Some(marker) = self.store.get(id) {
                return PointerOutcome::Selected(marker.clone());
            }
        }

        match self.create_at(board) {
            Some(marker) => PointerOutcome::Created(marker),
            None => PointerOutcome::Missed,
        }
    }

    /// Hit-tests `board` against the active regions and creates a marker.
    pub fn create_at(&mut self, board: BoardPoint) -> Option<Marker> {
        let region = hit_test::resolve(board, &self.regions);
        let marker = self.store.create(self.side, region, board)?;
        debug!(
            "event=marker_create module=service status=ok side={} region={}",
            marker.side.as_str(),
            marker.region_id.as_str()
        );
        self.persist();
        Some(marker)
    }

    pub fn update_marker(&mut self, id: MarkerId, patch: &MarkerPatch) -> Option<Marker> {
        let updated = self.store.update(id, patch)?;
        self.persist();
        Some(updated)
    }

    pub fn remove_marker(&mut self, id: MarkerId) -> Option<Marker> {
        let removed = self.store.remove(id)?;
        self.persist();
        Some(removed)
    }

    /// Clears markers on both sides, whichever side is being viewed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.store.clear_all();
        info!("event=markers_clear module=service status=ok count={removed}");
        self.persist();
        removed
    }

    pub fn select(&mut self, id: MarkerId) -> bool {
        self.store.select(id)
    }

    pub fn deselect(&mut self) {
        self.store.deselect();
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.store.selected()
    }

    /// Markers on `side` in creation order.
    pub fn markers(&self, side: Side) -> Vec<Marker> {
        self.store.query(side)
    }

    /// Markers on both sides in creation order.
    pub fn all_markers(&self) -> &[Marker] {
        self.store.all()
    }

    pub fn aggregate_load(&self) -> u32 {
        self.store.aggregate_load()
    }

    pub fn suggestions_for(&self, region_id: RegionId) -> &[Suggestion] {
        self.catalog.lookup(region_id)
    }

    /// Builds an export report over every marker.
    pub fn build_report(&self, generated_at: i64) -> Report {
        report::build(self.store.all(), &self.catalog, generated_at)
    }

    /// Builds a report stamped now and hands it to `renderer`.
    pub fn export_report(
        &self,
        renderer: &dyn ReportRenderer,
    ) -> Result<ExportPayload, RenderError> {
        let report = self.build_report(now_epoch_ms());
        renderer.render(&report)
    }

    fn pick_marker(&self, board: BoardPoint) -> Option<MarkerId> {
        self.store
            .all()
            .iter()
            .rev()
            .filter(|marker| marker.side == self.side)
            .find(|marker| marker_board_position(marker).distance_to(board) <= MARKER_PICK_RADIUS)
            .map(|marker| marker.id)
    }

    fn persist(&self) {
        if let Err(err) = self.cache.store(self.store.all()) {
            warn!(
                "event=cache_write module=service status=error count={} error={err}",
                self.store.len()
            );
        }
    }
}

/// Board position of a stored marker, for re-rendering at any display size.
pub fn marker_board_position(marker: &Marker) -> BoardPoint {
    to_board_from_normalized(NormalizedPoint {
        x: marker.x,
        y: marker.y,
    })
}
