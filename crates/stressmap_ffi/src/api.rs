//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the stress map session to Dart via FRB as plain view structs.
//! - Own the process-wide session and history ledger handles.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Marker mutations are `frb(sync)` and run one at a time under the
//!   session lock.
//! - `commit_markers`/`fetch_history` are async on the Dart side; commit
//!   snapshots markers under the session lock and releases it before talking
//!   to the history store.

use stressmap_core::{
    core_version as core_version_inner, init_logging as init_logging_inner,
    marker_board_position, ping as ping_inner, to_display_space, DisplayBounds, DisplayPoint,
    HistoryEntry, HistoryService, Intensity, Marker, MarkerPatch, PointerOutcome,
    ProportionPreset, ProtocolCatalog, Quality, Region, RegionId, RegionShape, Side,
    SqliteHistoryLedger, SqliteMarkerCache, StressMapService, BOARD_HEIGHT, BOARD_WIDTH,
};
use log::warn;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use uuid::Uuid;

const SESSION_DB_FILE_NAME: &str = "stressmap_session.sqlite3";
static SESSION_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

type Session = StressMapService<SqliteMarkerCache>;
type History = HistoryService<SqliteHistoryLedger>;

static SESSION: OnceLock<Mutex<Option<Session>>> = OnceLock::new();
static HISTORY: OnceLock<Mutex<Option<History>>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Canonical board size all region geometry is expressed in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardSize {
    pub width: f64,
    pub height: f64,
}

/// Display rectangle the host draws the board into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewBounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewBounds {
    fn to_core(self) -> DisplayBounds {
        DisplayBounds::new(self.x, self.y, self.width, self.height)
    }
}

/// Drawable region in board units.
///
/// Circles are reported by their bounding square with
/// `corner_radius == width / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionView {
    pub region_id: String,
    pub instance_label: String,
    pub side_affinity: String,
    /// `circle|rect`.
    pub shape_kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub corner_radius: f64,
    pub rotation_degrees: f64,
}

/// Marker projection for rendering and editing.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerView {
    pub marker_id: String,
    pub created_at: i64,
    pub side: String,
    pub region_id: String,
    pub region_label: String,
    /// Normalized position in `[0, 1]`.
    pub x: f64,
    pub y: f64,
    /// Position inside the requested view bounds, when bounds were given.
    pub display_x: Option<f64>,
    pub display_y: Option<f64>,
    pub intensity: u32,
    pub quality: String,
    pub note: Option<String>,
    pub selected: bool,
}

/// Active session selectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub preset: String,
    pub side: String,
    pub marker_count: u32,
    pub aggregate_load: u32,
}

/// Result of a pointer-down on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerResponse {
    /// `created|selected|missed`.
    pub outcome: String,
    pub marker: Option<MarkerView>,
}

/// Generic action response envelope for marker edits.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerActionResponse {
    pub ok: bool,
    pub marker: Option<MarkerView>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl MarkerActionResponse {
    fn success(message: impl Into<String>, marker: MarkerView) -> Self {
        Self {
            ok: true,
            marker: Some(marker),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            marker: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntryView {
    pub region_id: String,
    pub region_label: String,
    pub side: String,
    pub intensity: u32,
    pub quality: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionView {
    pub region_id: String,
    pub name: String,
    pub description: String,
}

/// Report data handed to the host's image export renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub generated_at: i64,
    pub entries: Vec<ReportEntryView>,
    pub aggregate_load: u32,
    pub suggestions: Vec<SuggestionView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitResponse {
    pub ok: bool,
    pub submitted: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryItem {
    pub id: i64,
    pub region_id: String,
    pub x: f64,
    pub y: f64,
    pub intensity: u32,
    pub quality: String,
    pub side: String,
    pub note: Option<String>,
    pub server_timestamp: i64,
}

#[flutter_rust_bridge::frb(sync)]
pub fn board_size() -> BoardSize {
    BoardSize {
        width: BOARD_WIDTH,
        height: BOARD_HEIGHT,
    }
}

/// Switches preset and/or side; `None` keeps the current value.
///
/// # FFI contract
/// - Unknown preset/side strings are rejected without changing state.
#[flutter_rust_bridge::frb(sync)]
pub fn session_configure(
    preset: Option<String>,
    side: Option<String>,
) -> Result<SessionState, String> {
    let preset = preset
        .map(|value| {
            ProportionPreset::parse(&value).ok_or_else(|| format!("unknown preset `{value}`"))
        })
        .transpose()?;
    let side = side
        .map(|value| Side::parse(&value).ok_or_else(|| format!("unknown side `{value}`")))
        .transpose()?;

    with_session(|session| {
        if let Some(preset) = preset {
            session.set_preset(preset);
        }
        if let Some(side) = side {
            session.set_side(side);
        }
        session_state(session)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn session_state_get() -> Result<SessionState, String> {
    with_session(|session| session_state(session))
}

/// Regions of the active preset/side in z-order (last drawn on top).
#[flutter_rust_bridge::frb(sync)]
pub fn body_regions() -> Result<Vec<RegionView>, String> {
    with_session(|session| session.regions().iter().map(to_region_view).collect())
}

/// Places or selects a marker under a pointer-down at `(x, y)`.
#[flutter_rust_bridge::frb(sync)]
pub fn pointer_down(x: f64, y: f64, bounds: ViewBounds) -> Result<PointerResponse, String> {
    with_session(|session| {
        let outcome = session.pointer_down(DisplayPoint { x, y }, bounds.to_core());
        let selected_id = session.selected().map(|marker| marker.id);
        let (label, marker) = match outcome {
            PointerOutcome::Created(marker) => ("created", Some(marker)),
            PointerOutcome::Selected(marker) => ("selected", Some(marker)),
            PointerOutcome::Missed => ("missed", None),
        };
        PointerResponse {
            outcome: label.to_string(),
            marker: marker.map(|marker| to_marker_view(&marker, selected_id, Some(bounds))),
        }
    })
}

/// Lists markers; `side = None` lists both sides.
#[flutter_rust_bridge::frb(sync)]
pub fn list_markers(
    side: Option<String>,
    bounds: Option<ViewBounds>,
) -> Result<Vec<MarkerView>, String> {
    let side = side
        .map(|value| Side::parse(&value).ok_or_else(|| format!("unknown side `{value}`")))
        .transpose()?;

    with_session(|session| {
        let selected_id = session.selected().map(|marker| marker.id);
        let markers = match side {
            Some(side) => session.markers(side),
            None => session.all_markers().to_vec(),
        };
        markers
            .iter()
            .map(|marker| to_marker_view(marker, selected_id, bounds))
            .collect()
    })
}

/// Applies quality/intensity/note edits to one marker.
///
/// # FFI contract
/// - `None` fields are left unchanged; an empty `note` clears the note.
/// - Invalid input or unknown ids return `ok=false` without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn update_marker(
    marker_id: String,
    quality: Option<String>,
    intensity: Option<u32>,
    note: Option<String>,
) -> MarkerActionResponse {
    let id = match parse_marker_id(&marker_id) {
        Ok(id) => id,
        Err(err) => return MarkerActionResponse::failure(err),
    };
    let patch = match build_patch(quality, intensity, note) {
        Ok(patch) => patch,
        Err(err) => return MarkerActionResponse::failure(format!("update_marker failed: {err}")),
    };

    let result = with_session(|session| {
        let updated = session.update_marker(id, &patch)?;
        let selected_id = session.selected().map(|marker| marker.id);
        Some(to_marker_view(&updated, selected_id, None))
    });
    match result {
        Ok(Some(view)) => MarkerActionResponse::success("Marker updated.", view),
        Ok(None) => MarkerActionResponse::failure(format!("marker not found: {marker_id}")),
        Err(err) => MarkerActionResponse::failure(format!("update_marker failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn remove_marker(marker_id: String) -> MarkerActionResponse {
    let id = match parse_marker_id(&marker_id) {
        Ok(id) => id,
        Err(err) => return MarkerActionResponse::failure(err),
    };
    match with_session(|session| session.remove_marker(id)) {
        Ok(Some(removed)) => {
            MarkerActionResponse::success("Marker removed.", to_marker_view(&removed, None, None))
        }
        Ok(None) => MarkerActionResponse::failure(format!("marker not found: {marker_id}")),
        Err(err) => MarkerActionResponse::failure(format!("remove_marker failed: {err}")),
    }
}

/// Selects a marker; returns `false` for unknown ids.
#[flutter_rust_bridge::frb(sync)]
pub fn select_marker(marker_id: String) -> bool {
    let Ok(id) = parse_marker_id(&marker_id) else {
        return false;
    };
    with_session(|session| session.select(id)).unwrap_or(false)
}

#[flutter_rust_bridge::frb(sync)]
pub fn deselect_marker() {
    let _ = with_session(|session| session.deselect());
}

/// Removes every marker on both sides; returns the removed count.
#[flutter_rust_bridge::frb(sync)]
pub fn clear_markers() -> u32 {
    with_session(|session| session.clear_all() as u32).unwrap_or(0)
}

/// Catalog suggestions for one region id, best match first.
///
/// # FFI contract
/// - Unknown region ids are rejected; known regions without entries yield an
///   empty list.
#[flutter_rust_bridge::frb(sync)]
pub fn region_suggestions(region_id: String) -> Result<Vec<SuggestionView>, String> {
    let id = RegionId::parse(&region_id).ok_or_else(|| format!("unknown region `{region_id}`"))?;
    with_session(|session| {
        session
            .suggestions_for(id)
            .iter()
            .map(|suggestion| SuggestionView {
                region_id: id.as_str().to_string(),
                name: suggestion.name.clone(),
                description: suggestion.description.clone(),
            })
            .collect()
    })
}

/// Builds the export report over every marker.
#[flutter_rust_bridge::frb(sync)]
pub fn build_report(generated_at: i64) -> Result<ReportView, String> {
    with_session(|session| {
        let report = session.build_report(generated_at);
        ReportView {
            generated_at: report.generated_at,
            aggregate_load: report.aggregate_load,
            entries: report
                .entries
                .into_iter()
                .map(|entry| ReportEntryView {
                    region_id: entry.region_id.as_str().to_string(),
                    region_label: entry.region_label,
                    side: entry.side.as_str().to_string(),
                    intensity: u32::from(entry.intensity),
                    quality: entry.quality.as_str().to_string(),
                    note: entry.note,
                })
                .collect(),
            suggestions: report
                .top_suggestions_by_region
                .into_iter()
                .map(|item| SuggestionView {
                    region_id: item.region_id.as_str().to_string(),
                    name: item.suggestion.name,
                    description: item.suggestion.description,
                })
                .collect(),
        }
    })
}

/// Pushes the current markers (both sides) to history.
///
/// # FFI contract
/// - Async on the Dart side; does not hold the session lock while submitting.
/// - Never alters markers. Repeated calls append duplicate history rows.
pub fn commit_markers() -> CommitResponse {
    let snapshot = match with_session(|session| session.all_markers().to_vec()) {
        Ok(markers) => markers,
        Err(err) => {
            return CommitResponse {
                ok: false,
                submitted: 0,
                message: format!("commit_markers failed: {err}"),
            };
        }
    };

    match with_history(|history| history.commit(&snapshot)) {
        Ok(status) if status.ok => CommitResponse {
            ok: true,
            submitted: status.submitted as u32,
            message: format!("Committed {} marker(s).", status.submitted),
        },
        Ok(_) => CommitResponse {
            ok: false,
            submitted: 0,
            message: "commit_markers failed: history store rejected the submission".to_string(),
        },
        Err(err) => CommitResponse {
            ok: false,
            submitted: 0,
            message: format!("commit_markers failed: {err}"),
        },
    }
}

/// Reads prior submissions, newest first; empty when history is unavailable.
pub fn fetch_history() -> Vec<HistoryItem> {
    with_history(|history| history.fetch_history())
        .unwrap_or_default()
        .into_iter()
        .map(to_history_item)
        .collect()
}

fn build_patch(
    quality: Option<String>,
    intensity: Option<u32>,
    note: Option<String>,
) -> Result<MarkerPatch, String> {
    let quality = quality
        .map(|value| Quality::parse(&value).ok_or_else(|| format!("unknown quality `{value}`")))
        .transpose()?;
    let intensity = intensity
        .map(|value| Intensity::new(i64::from(value)).map_err(|err| err.to_string()))
        .transpose()?;
    Ok(MarkerPatch {
        quality,
        intensity,
        note,
    })
}

fn parse_marker_id(value: &str) -> Result<Uuid, String> {
    Uuid::parse_str(value.trim()).map_err(|_| format!("invalid marker id `{value}`"))
}

fn session_state(session: &Session) -> SessionState {
    SessionState {
        preset: session.preset().as_str().to_string(),
        side: session.side().as_str().to_string(),
        marker_count: session.all_markers().len() as u32,
        aggregate_load: session.aggregate_load(),
    }
}

fn to_region_view(region: &Region) -> RegionView {
    let (x, y, width, height, corner_radius, rotation_degrees) = match region.shape {
        RegionShape::Circle(circle) => (
            circle.center_x - circle.radius,
            circle.center_y - circle.radius,
            circle.radius * 2.0,
            circle.radius * 2.0,
            circle.radius,
            0.0,
        ),
        RegionShape::Rect(rect) => (
            rect.origin_x,
            rect.origin_y,
            rect.width,
            rect.height,
            rect.corner_radius,
            rect.rotation_degrees.unwrap_or(0.0),
        ),
    };
    RegionView {
        region_id: region.id.as_str().to_string(),
        instance_label: region.instance_label.clone(),
        side_affinity: region.side_affinity.as_str().to_string(),
        shape_kind: region.shape.kind_str().to_string(),
        x,
        y,
        width,
        height,
        corner_radius,
        rotation_degrees,
    }
}

fn to_marker_view(
    marker: &Marker,
    selected_id: Option<Uuid>,
    bounds: Option<ViewBounds>,
) -> MarkerView {
    let display = bounds.and_then(|bounds| {
        to_display_space(marker_board_position(marker), bounds.to_core())
    });
    MarkerView {
        marker_id: marker.id.to_string(),
        created_at: marker.created_at,
        side: marker.side.as_str().to_string(),
        region_id: marker.region_id.as_str().to_string(),
        region_label: marker.region_label.clone(),
        x: marker.x,
        y: marker.y,
        display_x: display.map(|point| point.x),
        display_y: display.map(|point| point.y),
        intensity: u32::from(marker.intensity.get()),
        quality: marker.quality.as_str().to_string(),
        note: marker.note.clone(),
        selected: selected_id == Some(marker.id),
    }
}

fn to_history_item(entry: HistoryEntry) -> HistoryItem {
    HistoryItem {
        id: entry.id,
        region_id: entry.region.as_str().to_string(),
        x: entry.x,
        y: entry.y,
        intensity: u32::from(entry.intensity.get()),
        quality: entry.quality.as_str().to_string(),
        side: entry.side.as_str().to_string(),
        note: entry.note,
        server_timestamp: entry.server_timestamp,
    }
}

fn resolve_session_db_path() -> PathBuf {
    SESSION_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("STRESSMAP_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(SESSION_DB_FILE_NAME)
        })
        .clone()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn open_session() -> Result<Session, String> {
    let cache = match SqliteMarkerCache::open(resolve_session_db_path()) {
        Ok(cache) => cache,
        Err(err) => {
            warn!("event=session_open module=ffi status=fallback mode=memory error={err}");
            SqliteMarkerCache::in_memory().map_err(|err| format!("session open failed: {err}"))?
        }
    };
    Ok(StressMapService::open(
        cache,
        ProtocolCatalog::builtin(),
        ProportionPreset::Broad,
        Side::Front,
    ))
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let mut guard = lock(SESSION.get_or_init(|| Mutex::new(None)));
    if guard.is_none() {
        *guard = Some(open_session()?);
    }
    match guard.as_mut() {
        Some(session) => Ok(f(session)),
        None => Err("session unavailable".to_string()),
    }
}

fn with_history<T>(f: impl FnOnce(&mut History) -> T) -> Result<T, String> {
    let mut guard = lock(HISTORY.get_or_init(|| Mutex::new(None)));
    if guard.is_none() {
        let ledger = SqliteHistoryLedger::open(resolve_session_db_path())
            .map_err(|err| format!("history ledger open failed: {err}"))?;
        *guard = Some(HistoryService::new(ledger));
    }
    match guard.as_mut() {
        Some(history) => Ok(f(history)),
        None => Err("history unavailable".to_string()),
    }
}
