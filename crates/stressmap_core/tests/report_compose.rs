use stressmap_core::service::report::{build, MAX_SUGGESTED_REGIONS};
use stressmap_core::{
    BoardPoint, ExportPayload, MarkerPatch, ProportionPreset, ProtocolCatalog, Quality, RegionId,
    RenderError, Report, ReportRenderer, Side, SqliteMarkerCache, StressMapService, Suggestion,
};

fn open_service(catalog: ProtocolCatalog) -> StressMapService<SqliteMarkerCache> {
    StressMapService::open(
        SqliteMarkerCache::in_memory().unwrap(),
        catalog,
        ProportionPreset::Broad,
        Side::Front,
    )
}

#[test]
fn entries_follow_marker_order_and_content() {
    let mut service = open_service(ProtocolCatalog::builtin());
    let chest = service.create_at(BoardPoint::new(160.0, 152.0)).unwrap();
    service.create_at(BoardPoint::new(160.0, 52.0)).unwrap();
    service
        .update_marker(
            chest.id,
            &MarkerPatch {
                quality: Some(Quality::Burn),
                note: Some("after run".to_string()),
                ..MarkerPatch::default()
            },
        )
        .unwrap();

    let report = service.build_report(42);
    assert_eq!(report.generated_at, 42);
    assert_eq!(report.entries.len(), 2);
    assert_eq!(report.entries[0].region_id, RegionId::Chest);
    assert_eq!(report.entries[0].quality, Quality::Burn);
    assert_eq!(report.entries[0].note.as_deref(), Some("after run"));
    assert_eq!(report.entries[1].region_id, RegionId::Head);
    assert_eq!(report.aggregate_load, 10);
}

#[test]
fn suggestions_cover_first_three_distinct_regions() {
    let mut service = open_service(ProtocolCatalog::builtin());
    for point in [
        BoardPoint::new(160.0, 152.0), // chest
        BoardPoint::new(160.0, 140.0), // chest again
        BoardPoint::new(160.0, 52.0),  // head
        BoardPoint::new(160.0, 240.0), // abdomen
        BoardPoint::new(160.0, 93.0),  // neck
    ] {
        service.create_at(point).unwrap();
    }

    let report = service.build_report(0);
    let regions = report
        .top_suggestions_by_region
        .iter()
        .map(|item| item.region_id)
        .collect::<Vec<_>>();
    assert_eq!(regions.len(), MAX_SUGGESTED_REGIONS);
    assert_eq!(
        regions,
        vec![RegionId::Chest, RegionId::Head, RegionId::Abdomen]
    );
    assert_eq!(
        report.top_suggestions_by_region[0].suggestion,
        ProtocolCatalog::builtin().lookup(RegionId::Chest)[0]
    );
}

#[test]
fn regions_without_protocols_are_omitted() {
    let catalog = ProtocolCatalog::from_entries([
        (RegionId::Head, vec![Suggestion::new("Rest", "Dim the lights")]),
        (RegionId::Chest, Vec::new()),
    ]);
    let mut service = open_service(catalog);
    service.create_at(BoardPoint::new(160.0, 152.0)).unwrap();
    service.create_at(BoardPoint::new(160.0, 52.0)).unwrap();
    service.create_at(BoardPoint::new(160.0, 93.0)).unwrap();

    let report = service.build_report(0);
    assert_eq!(report.top_suggestions_by_region.len(), 1);
    assert_eq!(report.top_suggestions_by_region[0].region_id, RegionId::Head);
    assert_eq!(report.top_suggestions_by_region[0].suggestion.name, "Rest");
}

#[test]
fn empty_marker_set_builds_empty_report() {
    let report = build(&[], &ProtocolCatalog::builtin(), 7);
    assert!(report.entries.is_empty());
    assert_eq!(report.aggregate_load, 0);
    assert!(report.top_suggestions_by_region.is_empty());
}

#[test]
fn export_hands_report_to_renderer() {
    let mut service = open_service(ProtocolCatalog::builtin());
    service.create_at(BoardPoint::new(160.0, 152.0)).unwrap();

    let payload = service.export_report(&SummaryRenderer).unwrap();
    assert_eq!(payload, ExportPayload::Bytes(b"entries=1 load=5".to_vec()));

    let err = open_service(ProtocolCatalog::builtin())
        .export_report(&SummaryRenderer)
        .unwrap_err();
    assert!(err.to_string().contains("nothing to render"));
}

struct SummaryRenderer;

impl ReportRenderer for SummaryRenderer {
    fn render(&self, report: &Report) -> Result<ExportPayload, RenderError> {
        if report.entries.is_empty() {
            return Err(RenderError::new("nothing to render"));
        }
        Ok(ExportPayload::Bytes(
            format!(
                "entries={} load={}",
                report.entries.len(),
                report.aggregate_load
            )
            .into_bytes(),
        ))
    }
}
