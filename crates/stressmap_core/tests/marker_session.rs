use std::cell::{Cell, RefCell};
use std::rc::Rc;
use stressmap_core::{
    marker_board_position, to_display_space, BoardPoint, DisplayBounds, DisplayPoint, Intensity,
    Marker, MarkerCache, MarkerPatch, PointerOutcome, ProportionPreset, ProtocolCatalog, Quality,
    RegionId, RepoError, RepoResult, Side, SqliteMarkerCache, StressMapService,
};

const CHEST_CENTER: BoardPoint = BoardPoint { x: 160.0, y: 152.0 };
const HEAD_CENTER: BoardPoint = BoardPoint { x: 160.0, y: 52.0 };
const NECK_CENTER: BoardPoint = BoardPoint { x: 160.0, y: 93.0 };

fn open_service() -> StressMapService<SqliteMarkerCache> {
    StressMapService::open(
        SqliteMarkerCache::in_memory().unwrap(),
        ProtocolCatalog::builtin(),
        ProportionPreset::Broad,
        Side::Front,
    )
}

fn intensity(value: i64) -> Intensity {
    Intensity::new(value).unwrap()
}

#[test]
fn pointer_on_chest_center_creates_chest_marker() {
    let mut service = open_service();
    let bounds = DisplayBounds::new(24.0, 48.0, 160.0, 320.0);
    let display = to_display_space(CHEST_CENTER, bounds).unwrap();

    let outcome = service.pointer_down(display, bounds);
    let PointerOutcome::Created(marker) = outcome else {
        panic!("expected a created marker, got {outcome:?}");
    };
    assert_eq!(marker.region_id, RegionId::Chest);
    assert_eq!(marker.side, Side::Front);
    assert_eq!(marker.intensity.get(), 5);
    assert_eq!(marker.quality, Quality::Ache);
    assert!((marker.x - 0.5).abs() < 1e-9);
    assert!((marker.y - 152.0 / 640.0).abs() < 1e-9);
    assert_eq!(service.selected().map(|m| m.id), Some(marker.id));
}

#[test]
fn pointer_near_existing_marker_selects_it() {
    let mut service = open_service();
    let first = service.create_at(CHEST_CENTER).unwrap();
    let second = service.create_at(HEAD_CENTER).unwrap();
    assert_eq!(service.selected().map(|m| m.id), Some(second.id));

    let bounds = DisplayBounds::sized(320.0, 640.0);
    let near_first = DisplayPoint {
        x: CHEST_CENTER.x + 3.0,
        y: CHEST_CENTER.y - 2.0,
    };
    match service.pointer_down(near_first, bounds) {
        PointerOutcome::Selected(marker) => assert_eq!(marker.id, first.id),
        other => panic!("expected selection, got {other:?}"),
    }
    assert_eq!(service.all_markers().len(), 2);
    assert_eq!(service.selected().map(|m| m.id), Some(first.id));
}

#[test]
fn pointer_miss_leaves_state_unchanged() {
    let mut service = open_service();
    let marker = service.create_at(CHEST_CENTER).unwrap();

    let outcome = service.pointer_down(
        DisplayPoint { x: 2.0, y: 2.0 },
        DisplayBounds::sized(320.0, 640.0),
    );
    assert_eq!(outcome, PointerOutcome::Missed);
    assert_eq!(service.all_markers().len(), 1);
    assert_eq!(service.selected().map(|m| m.id), Some(marker.id));

    let degenerate = service.pointer_down(
        DisplayPoint { x: 160.0, y: 152.0 },
        DisplayBounds::sized(0.0, 640.0),
    );
    assert_eq!(degenerate, PointerOutcome::Missed);
}

#[test]
fn aggregate_load_tracks_intensity_sum() {
    let mut service = open_service();
    let a = service.create_at(CHEST_CENTER).unwrap();
    let b = service.create_at(HEAD_CENTER).unwrap();
    let patch = |value| MarkerPatch {
        intensity: Some(intensity(value)),
        ..MarkerPatch::default()
    };

    service.update_marker(a.id, &patch(7)).unwrap();
    service.update_marker(b.id, &patch(3)).unwrap();
    assert_eq!(service.aggregate_load(), 10);
    assert_eq!(service.build_report(0).aggregate_load, 10);

    let c = service.create_at(NECK_CENTER).unwrap();
    assert_eq!(service.aggregate_load(), 15);
    service.remove_marker(a.id).unwrap();
    assert_eq!(service.aggregate_load(), 8);
    service.update_marker(c.id, &patch(1)).unwrap();
    let expected = service
        .all_markers()
        .iter()
        .map(|m| u32::from(m.intensity.get()))
        .sum::<u32>();
    assert_eq!(service.aggregate_load(), expected);
    assert_eq!(service.build_report(0).aggregate_load, expected);
}

#[test]
fn updated_quality_shows_in_report() {
    let mut service = open_service();
    let marker = service.create_at(CHEST_CENTER).unwrap();
    let patch = MarkerPatch {
        quality: Some(Quality::Sharp),
        ..MarkerPatch::default()
    };

    let once = service.update_marker(marker.id, &patch).unwrap();
    let twice = service.update_marker(marker.id, &patch).unwrap();
    assert_eq!(once, twice);

    let report = service.build_report(1_700_000_000_000);
    assert_eq!(report.entries.len(), 1);
    assert_eq!(report.entries[0].quality, Quality::Sharp);
    assert_eq!(report.generated_at, 1_700_000_000_000);
}

#[test]
fn removing_selected_marker_clears_selection() {
    let mut service = open_service();
    let marker = service.create_at(CHEST_CENTER).unwrap();
    assert!(service.selected().is_some());

    service.remove_marker(marker.id).unwrap();
    assert!(service.selected().is_none());
    assert!(service.remove_marker(marker.id).is_none());
}

#[test]
fn clear_all_empties_both_sides() {
    let mut service = open_service();
    service.create_at(CHEST_CENTER).unwrap();
    service.set_side(Side::Back);
    let back = service.create_at(CHEST_CENTER).unwrap();
    assert_eq!(back.region_id, RegionId::UpperBack);
    assert_eq!(service.markers(Side::Front).len(), 1);
    assert_eq!(service.markers(Side::Back).len(), 1);

    assert_eq!(service.clear_all(), 2);
    assert!(service.markers(Side::Front).is_empty());
    assert!(service.markers(Side::Back).is_empty());
    assert!(service.selected().is_none());
}

#[test]
fn preset_switch_regenerates_regions() {
    let mut service = open_service();
    let broad = service.regions().to_vec();
    service.set_preset(ProportionPreset::Rounded);
    assert_eq!(service.preset(), ProportionPreset::Rounded);
    assert_ne!(service.regions(), broad.as_slice());
    service.set_preset(ProportionPreset::Broad);
    assert_eq!(service.regions(), broad.as_slice());
}

#[test]
fn markers_keep_relative_position_across_display_sizes() {
    let mut service = open_service();
    let marker = service.create_at(HEAD_CENTER).unwrap();
    let board = marker_board_position(&marker);

    let small = to_display_space(board, DisplayBounds::sized(160.0, 320.0)).unwrap();
    let large = to_display_space(board, DisplayBounds::new(10.0, 10.0, 640.0, 1280.0)).unwrap();
    assert!((small.x / 160.0 - (large.x - 10.0) / 640.0).abs() < 1e-9);
    assert!((small.y / 320.0 - (large.y - 10.0) / 1280.0).abs() < 1e-9);
}

#[test]
fn cache_mirrors_every_mutation_and_restores_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.sqlite3");

    let (kept_id, removed_id) = {
        let mut service = StressMapService::open(
            SqliteMarkerCache::open(&path).unwrap(),
            ProtocolCatalog::builtin(),
            ProportionPreset::Broad,
            Side::Front,
        );
        let kept = service.create_at(CHEST_CENTER).unwrap();
        let removed = service.create_at(HEAD_CENTER).unwrap();
        service
            .update_marker(
                kept.id,
                &MarkerPatch {
                    note: Some("after long drive".to_string()),
                    intensity: Some(intensity(9)),
                    ..MarkerPatch::default()
                },
            )
            .unwrap();
        service.remove_marker(removed.id).unwrap();
        (kept.id, removed.id)
    };

    let reopened = StressMapService::open(
        SqliteMarkerCache::open(&path).unwrap(),
        ProtocolCatalog::builtin(),
        ProportionPreset::Rounded,
        Side::Back,
    );
    let restored = reopened.all_markers();
    assert_eq!(restored.len(), 1);
    assert_eq!(restored[0].id, kept_id);
    assert_ne!(restored[0].id, removed_id);
    assert_eq!(restored[0].note.as_deref(), Some("after long drive"));
    assert_eq!(restored[0].intensity.get(), 9);
    assert!(reopened.selected().is_none());
}

#[test]
fn clear_all_is_mirrored_to_cache() {
    let cache = RecordingCache::default();
    let mut service = StressMapService::open(
        cache.clone(),
        ProtocolCatalog::builtin(),
        ProportionPreset::Broad,
        Side::Front,
    );
    let marker = service.create_at(CHEST_CENTER).unwrap();
    service.deselect();
    assert!(service.select(marker.id));
    service.clear_all();

    let snapshots = cache.snapshots.borrow();
    assert_eq!(snapshots.len(), 2, "selection must not trigger a cache write");
    assert_eq!(snapshots[0].len(), 1);
    assert!(snapshots[1].is_empty());
}

#[test]
fn cache_failures_do_not_break_the_session() {
    let cache = FailingCache::default();
    let mut service = StressMapService::open(
        cache.clone(),
        ProtocolCatalog::builtin(),
        ProportionPreset::Broad,
        Side::Front,
    );
    let marker = service.create_at(CHEST_CENTER).unwrap();
    service
        .update_marker(
            marker.id,
            &MarkerPatch {
                quality: Some(Quality::Numb),
                ..MarkerPatch::default()
            },
        )
        .unwrap();
    assert_eq!(service.all_markers().len(), 1);
    assert_eq!(service.all_markers()[0].quality, Quality::Numb);
    assert_eq!(cache.attempts.get(), 2);
}

#[derive(Clone, Default)]
struct RecordingCache {
    snapshots: Rc<RefCell<Vec<Vec<Marker>>>>,
}

impl MarkerCache for RecordingCache {
    fn load(&self) -> RepoResult<Option<Vec<Marker>>> {
        Ok(None)
    }

    fn store(&self, markers: &[Marker]) -> RepoResult<()> {
        self.snapshots.borrow_mut().push(markers.to_vec());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct FailingCache {
    attempts: Rc<Cell<usize>>,
}

impl MarkerCache for FailingCache {
    fn load(&self) -> RepoResult<Option<Vec<Marker>>> {
        Err(RepoError::InvalidData("slot unreadable".to_string()))
    }

    fn store(&self, _markers: &[Marker]) -> RepoResult<()> {
        self.attempts.set(self.attempts.get() + 1);
        Err(RepoError::InvalidData("disk full".to_string()))
    }
}
