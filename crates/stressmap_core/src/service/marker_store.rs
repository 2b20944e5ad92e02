//! In-memory marker collection.
//!
//! # Responsibility
//! - Own the mutable list of markers for both views.
//! - Track the single selected marker.
//!
//! # Invariants
//! - Markers are created only from a resolved region valid for the side.
//! - At most one marker is selected; the selection always points at a
//!   marker that exists.
//! - Storage is one collection in creation order; per-side reads are
//!   projections, not partitions.
//! - Unknown ids are silent no-ops.

use crate::geometry::coords::{to_normalized, BoardPoint};
use crate::model::marker::{Intensity, Marker, MarkerId, MarkerPatch, Quality};
use crate::model::region::{Region, Side};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Quality assigned to freshly created markers.
pub const DEFAULT_QUALITY: Quality = Quality::Ache;

#[derive(Debug, Clone, Default)]
pub struct MarkerStore {
    markers: Vec<Marker>,
    selected: Option<MarkerId>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a marker for a resolved hit and selects it.
    ///
    /// # Contract
    /// - `region = None` (hit miss) leaves collection and selection untouched.
    /// - A region that does not exist on `side` is treated as a miss.
    /// - New markers start at intensity 5 with quality `ache`.
    pub fn create(
        &mut self,
        side: Side,
        region: Option<&Region>,
        point: BoardPoint,
    ) -> Option<Marker> {
        let region = region?;
        if !region.id.is_valid_for(side) {
            return None;
        }

        let normalized = to_normalized(point);
        let marker = Marker {
            id: Uuid::new_v4(),
            created_at: now_epoch_ms(),
            side,
            region_id: region.id,
            region_label: region.instance_label.clone(),
            x: normalized.x.clamp(0.0, 1.0),
            y: normalized.y.clamp(0.0, 1.0),
            intensity: Intensity::DEFAULT,
            quality: DEFAULT_QUALITY,
            note: None,
        };

        self.selected = Some(marker.id);
        self.markers.push(marker.clone());
        Some(marker)
    }

    /// Merges `patch` into the marker with `id`.
    ///
    /// Returns the updated marker, or `None` when `id` is unknown.
    pub fn update(&mut self, id: MarkerId, patch: &MarkerPatch) -> Option<Marker> {
        let marker = self.markers.iter_mut().find(|marker| marker.id == id)?;
        patch.apply_to(marker);
        Some(marker.clone())
    }

    /// Removes one marker; clears the selection when it pointed at it.
    pub fn remove(&mut self, id: MarkerId) -> Option<Marker> {
        let index = self.markers.iter().position(|marker| marker.id == id)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(self.markers.remove(index))
    }

    /// Removes every marker on both sides and clears the selection.
    ///
    /// Returns the number of removed markers.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.markers.len();
        self.markers.clear();
        self.selected = None;
        removed
    }

    /// Replaces the whole collection; used when restoring a cached session.
    pub fn replace_all(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
        self.selected = None;
    }

    /// Markers placed on `side`, in creation order.
    pub fn query(&self, side: Side) -> Vec<Marker> {
        self.markers
            .iter()
            .filter(|marker| marker.side == side)
            .cloned()
            .collect()
    }

    /// Every marker on both sides, in creation order.
    pub fn all(&self) -> &[Marker] {
        &self.markers
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.markers.iter().find(|marker| marker.id == id)
    }

    /// Selects an existing marker; unknown ids keep the current selection.
    pub fn select(&mut self, id: MarkerId) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected_id(&self) -> Option<MarkerId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Sum of intensities over all markers.
    pub fn aggregate_load(&self) -> u32 {
        aggregate_load(&self.markers)
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

pub(crate) fn aggregate_load(markers: &[Marker]) -> u32 {
    markers
        .iter()
        .map(|marker| u32::from(marker.intensity.get()))
        .sum()
}

pub(crate) fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::MarkerStore;
    use crate::geometry::coords::BoardPoint;
    use crate::model::marker::{Intensity, MarkerPatch, Quality};
    use crate::model::region::{CircleGeometry, Region, RegionId, RegionShape, Side};
    use uuid::Uuid;

    fn region(id: RegionId) -> Region {
        Region::new(
            id,
            "Test Region",
            RegionShape::Circle(CircleGeometry {
                center_x: 160.0,
                center_y: 320.0,
                radius: 20.0,
            }),
        )
    }

    #[test]
    fn create_sets_defaults_and_selects() {
        let mut store = MarkerStore::new();
        let marker = store
            .create(Side::Front, Some(&region(RegionId::Neck)), BoardPoint::new(80.0, 160.0))
            .expect("hit should create a marker");

        assert_eq!(marker.intensity, Intensity::DEFAULT);
        assert_eq!(marker.quality, Quality::Ache);
        assert_eq!(marker.region_label, "Test Region");
        assert_eq!((marker.x, marker.y), (0.25, 0.25));
        assert_eq!(store.selected_id(), Some(marker.id));
    }

    #[test]
    fn create_miss_is_noop() {
        let mut store = MarkerStore::new();
        let first = store
            .create(Side::Front, Some(&region(RegionId::Head)), BoardPoint::new(1.0, 1.0))
            .unwrap();

        assert!(store.create(Side::Front, None, BoardPoint::new(2.0, 2.0)).is_none());
        assert_eq!(store.len(), 1);
        assert_eq!(store.selected_id(), Some(first.id));
    }

    #[test]
    fn create_rejects_region_not_on_side() {
        let mut store = MarkerStore::new();
        let created = store.create(
            Side::Back,
            Some(&region(RegionId::Chest)),
            BoardPoint::new(2.0, 2.0),
        );
        assert!(created.is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn update_is_idempotent() {
        let mut store = MarkerStore::new();
        let marker = store
            .create(Side::Back, Some(&region(RegionId::LowerBack)), BoardPoint::new(5.0, 5.0))
            .unwrap();
        let patch = MarkerPatch {
            quality: Some(Quality::Burn),
            intensity: Some(Intensity::new(8).unwrap()),
            note: Some(" after lifting ".to_string()),
        };

        let once = store.update(marker.id, &patch).unwrap();
        let twice = store.update(marker.id, &patch).unwrap();
        assert_eq!(once, twice);
        assert_eq!(twice.note.as_deref(), Some("after lifting"));
        assert!(store.update(Uuid::new_v4(), &patch).is_none());
    }

    #[test]
    fn select_switches_and_remove_clears_selection() {
        let mut store = MarkerStore::new();
        let a = store
            .create(Side::Front, Some(&region(RegionId::Head)), BoardPoint::new(1.0, 1.0))
            .unwrap();
        let b = store
            .create(Side::Front, Some(&region(RegionId::Neck)), BoardPoint::new(2.0, 2.0))
            .unwrap();
        assert_eq!(store.selected_id(), Some(b.id));

        assert!(store.select(a.id));
        assert_eq!(store.selected_id(), Some(a.id));
        assert!(!store.select(Uuid::new_v4()));
        assert_eq!(store.selected_id(), Some(a.id));

        store.remove(b.id);
        assert_eq!(store.selected_id(), Some(a.id));
        store.remove(a.id);
        assert_eq!(store.selected_id(), None);
    }
}
