//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level journal functions to Dart via FRB.
//! - Resolve process configuration (entry store, media store) once.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Failures come back as envelopes with `ok=false` and a user-facing
//!   message; details go to the log.
//! - Identity is resolved by the host and passed per call.

use chrono::Datelike;
use log::warn;
use memoir_core::calendar::{month_grid, DayCell, WEEKDAY_LABELS};
use memoir_core::db::open_db;
use memoir_core::highlights::EMPTY_MESSAGE;
use memoir_core::layout::gesture::{commit_drag, EditorSession, GestureDelta};
use memoir_core::model::entry::{
    parse_date_key, EntryValidationError, VoiceNote, MAX_PHOTOS_PER_ENTRY,
};
use memoir_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    select_layout, AccessToken, DragMode, EntryForm, HighlightsCompositor, JournalService,
    JournalServiceError, LocalObjectStore, MediaBlob, MediaBucket, Mood, MonthCursor,
    ObjectStore, Photo, SqliteEntryRepository, StaticSession,
};
use std::path::PathBuf;
use std::sync::OnceLock;
use uuid::Uuid;

const ENTRY_DB_FILE_NAME: &str = "memoir_entries.sqlite3";
const MEDIA_DIR_NAME: &str = "memoir_media";

static CONFIG: OnceLock<FfiConfig> = OnceLock::new();

/// Process configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
struct FfiConfig {
    db_path: PathBuf,
    media_dir: PathBuf,
    media_base_url: String,
}

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

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Stored entry ID or uploaded object URL, depending on the call.
    pub value: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, value: String) -> Self {
        Self {
            ok: true,
            value: Some(value),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            value: None,
            message: message.into(),
        }
    }
}

/// Entry list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryListResponse {
    pub ok: bool,
    /// JSON array of entries, newest date first.
    pub entries_json: String,
    pub count: u32,
    pub message: String,
}

/// Lists every entry of `user_id`.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_list(user_id: String) -> EntryListResponse {
    let loaded = with_journal_service(&user_id, None, |service| service.load_entries())
        .and_then(|entries| {
            serde_json::to_string(&entries)
                .map(|json| (entries.len(), json))
                .map_err(|err| format!("entry_list encode failed: {err}"))
        });
    match loaded {
        Ok((count, entries_json)) => EntryListResponse {
            ok: true,
            entries_json,
            count: u32::try_from(count).unwrap_or(u32::MAX),
            message: format!("Loaded {count} entr(ies)."),
        },
        Err(message) => EntryListResponse {
            ok: false,
            entries_json: "[]".to_string(),
            count: 0,
            message,
        },
    }
}

/// Saves the entry for `date` (`YYYY-MM-DD`), replacing any existing one.
///
/// `photos_json` is a JSON array of photos in wire shape; `voice_note_json`
/// an optional voice note object.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Requires `access_token`.
/// - Returns the stored entry ID on success.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn entry_save(
    user_id: String,
    access_token: Option<String>,
    date: String,
    title: String,
    caption: String,
    hashtags: String,
    song_url: String,
    mood: String,
    photos_json: String,
    voice_note_json: Option<String>,
) -> ActionResponse {
    let Some(date) = parse_date_key(&date) else {
        return ActionResponse::failure(format!("invalid date `{date}`; expected YYYY-MM-DD"));
    };
    let Some(mood) = Mood::parse(&mood) else {
        return ActionResponse::failure(format!("unknown mood `{mood}`"));
    };
    let photos: Vec<Photo> = match serde_json::from_str(&photos_json) {
        Ok(photos) => photos,
        Err(err) => return ActionResponse::failure(format!("invalid photos_json: {err}")),
    };
    if photos.len() > MAX_PHOTOS_PER_ENTRY {
        let err = EntryValidationError::TooManyPhotos {
            count: photos.len(),
        };
        warn!("event=entry_save module=ffi status=rejected error={err}");
        return ActionResponse::failure(JournalServiceError::from(err).user_message());
    }
    let voice_note: Option<VoiceNote> = match voice_note_json
        .as_deref()
        .map(|json| serde_json::from_str(json))
        .transpose()
    {
        Ok(note) => note,
        Err(err) => return ActionResponse::failure(format!("invalid voice_note_json: {err}")),
    };

    let saved = with_journal_service(&user_id, access_token, |service| {
        let mut form = match service.entry_for_date(date)? {
            Some(existing) => EntryForm::from_entry(&existing),
            None => EntryForm::new_for_date(date),
        };
        form.title = title;
        form.caption = caption;
        form.hashtags_text = hashtags;
        form.song_url = song_url;
        form.mood = mood;
        form.editor_mut().clear_photos();
        form.editor_mut().add_photos(photos);
        match voice_note {
            Some(note) => form.set_voice_note(note),
            None => {
                form.clear_voice_note();
            }
        }
        service.submit_form(&mut form)
    });

    match saved {
        Ok(entry) => ActionResponse::success("Entry saved.", entry.id.to_string()),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Deletes one entry and releases its media.
#[flutter_rust_bridge::frb(sync)]
pub fn entry_delete(
    user_id: String,
    access_token: Option<String>,
    entry_id: String,
) -> ActionResponse {
    let Ok(id) = Uuid::parse_str(entry_id.trim()) else {
        return ActionResponse::failure(format!("invalid entry id `{entry_id}`"));
    };
    match with_journal_service(&user_id, access_token, |service| service.delete_entry(id)) {
        Ok(()) => ActionResponse::success("Entry deleted.", id.to_string()),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Uploads one media file to `photos` or `voice-notes` and returns its URL.
#[flutter_rust_bridge::frb(sync)]
pub fn media_upload(
    user_id: String,
    access_token: Option<String>,
    bucket: String,
    file_name: String,
    bytes: Vec<u8>,
) -> ActionResponse {
    let bucket = match bucket.trim() {
        "photos" => MediaBucket::Photos,
        "voice-notes" => MediaBucket::VoiceNotes,
        other => return ActionResponse::failure(format!("unknown bucket `{other}`")),
    };
    let Some(token) = access_token.and_then(AccessToken::new) else {
        return ActionResponse::failure(JournalServiceError::AuthUnavailable.user_message());
    };

    let config = resolve_config();
    let store = LocalObjectStore::new(&config.media_dir, config.media_base_url.as_str());
    match store.upload(&MediaBlob::new(file_name, bytes), bucket, user_id.trim(), &token) {
        Ok(url) => ActionResponse::success("Uploaded.", url),
        Err(err) => {
            warn!("event=media_upload module=ffi status=error error={err}");
            ActionResponse::failure(JournalServiceError::from(err).user_message())
        }
    }
}

/// One template slot, as fractions of the collage area.
#[derive(Debug, Clone, PartialEq)]
pub struct CollageSlotItem {
    pub photo_index: u32,
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
    pub z_order: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollageLayoutResponse {
    /// `empty|single|overlap_pair|tall_split|grid|hero`.
    pub kind: String,
    pub slots: Vec<CollageSlotItem>,
}

/// Returns the collage template for `photo_count` photos.
#[flutter_rust_bridge::frb(sync)]
pub fn collage_layout(photo_count: u32) -> CollageLayoutResponse {
    let layout = select_layout(usize::try_from(photo_count).unwrap_or(usize::MAX));
    CollageLayoutResponse {
        kind: layout.kind.as_str().to_string(),
        slots: layout
            .slots
            .iter()
            .map(|slot| CollageSlotItem {
                photo_index: u32::try_from(slot.photo_index).unwrap_or(u32::MAX),
                left: slot.rect.x,
                top: slot.rect.y,
                width: slot.rect.width,
                height: slot.rect.height,
                z_order: slot.z_order,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoDragResponse {
    pub ok: bool,
    /// Updated photo in wire shape.
    pub photo_json: String,
    /// CSS `object-position` for the updated pan, e.g. `50% 50%`.
    pub object_position: String,
    /// Hint for the active mode, shown next to the toggle.
    pub mode_hint: String,
    pub message: String,
}

/// Commits a finished drag of `(dx, dy)` to one photo.
///
/// `mode` is `move` (frame offset) or `crop` (pan offset).
#[flutter_rust_bridge::frb(sync)]
pub fn collage_apply_drag(
    photo_json: String,
    mode: String,
    dx: f64,
    dy: f64,
) -> PhotoDragResponse {
    let mode = match mode.trim().to_ascii_lowercase().as_str() {
        "move" => DragMode::Move,
        "crop" => DragMode::Crop,
        other => return drag_failure(format!("unknown drag mode `{other}`"), photo_json),
    };
    let photo: Photo = match serde_json::from_str(&photo_json) {
        Ok(photo) => photo,
        Err(err) => return drag_failure(format!("invalid photo_json: {err}"), photo_json),
    };

    let session = EditorSession::new(mode);
    let updated = commit_drag(session, &photo, GestureDelta::new(dx, dy));
    match serde_json::to_string(&updated) {
        Ok(json) => PhotoDragResponse {
            ok: true,
            photo_json: json,
            object_position: updated.pan().object_position(),
            mode_hint: session.hint().to_string(),
            message: String::new(),
        },
        Err(err) => drag_failure(format!("photo encode failed: {err}"), photo_json),
    }
}

/// One calendar cell; `day` is `None` for leading blanks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarCellItem {
    pub day: Option<u32>,
    pub entry_id: Option<String>,
    pub mood: Option<String>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub ok: bool,
    /// e.g. `October 2026`.
    pub title: String,
    pub weekday_labels: Vec<String>,
    pub cells: Vec<CalendarCellItem>,
    pub message: String,
}

/// Builds the Sunday-first month grid for `user_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(user_id: String, year: i32, month: u32) -> CalendarMonthResponse {
    let weekday_labels = WEEKDAY_LABELS.iter().map(|label| label.to_string()).collect();
    let Some(cursor) = MonthCursor::new(year, month) else {
        return CalendarMonthResponse {
            ok: false,
            title: String::new(),
            weekday_labels,
            cells: Vec::new(),
            message: format!("invalid month {year}-{month}"),
        };
    };

    match with_journal_service(&user_id, None, |service| service.load_entries()) {
        Ok(entries) => {
            let grid = month_grid(cursor, &entries);
            let cells = grid.cells.iter().map(to_calendar_cell).collect();
            CalendarMonthResponse {
                ok: true,
                title: cursor.title(),
                weekday_labels,
                cells,
                message: String::new(),
            }
        }
        Err(message) => CalendarMonthResponse {
            ok: false,
            title: cursor.title(),
            weekday_labels,
            cells: Vec::new(),
            message,
        },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightItemView {
    pub photo_url: String,
    /// e.g. `Oct 5`.
    pub date_label: String,
    pub rotation: f64,
    pub scale: f64,
    pub grow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightsResponse {
    pub ok: bool,
    pub title: String,
    /// e.g. `12 Memories captured`.
    pub summary: String,
    pub file_name: String,
    pub items: Vec<HighlightItemView>,
    /// Seed to pass back to re-render the same scatter.
    pub seed: Option<u64>,
    pub message: String,
}

/// Composes month highlights (`month` set) or the year recap.
///
/// Pass a previous `seed` to reproduce an earlier scatter.
#[flutter_rust_bridge::frb(sync)]
pub fn highlights_compose(
    user_id: String,
    year: i32,
    month: Option<u32>,
    seed: Option<u64>,
) -> HighlightsResponse {
    let compositor = seed.map_or_else(HighlightsCompositor::new, HighlightsCompositor::with_seed);
    let cursor = match month {
        Some(month) => match MonthCursor::new(year, month) {
            Some(cursor) => Some(cursor),
            None => {
                return HighlightsResponse {
                    ok: false,
                    title: String::new(),
                    summary: String::new(),
                    file_name: String::new(),
                    items: Vec::new(),
                    seed: None,
                    message: format!("invalid month {year}-{month}"),
                }
            }
        },
        None => None,
    };

    let composed = with_journal_service(&user_id, None, |service| match cursor {
        Some(cursor) => service.month_highlights(cursor, &compositor),
        None => service.year_highlights(year, &compositor),
    });

    match composed {
        Ok(highlights) => {
            let items: Vec<HighlightItemView> = highlights
                .items()
                .iter()
                .map(|item| HighlightItemView {
                    photo_url: item.photo.url.clone(),
                    date_label: item.date_label(),
                    rotation: item.rotation,
                    scale: item.scale,
                    grow: item.grow,
                })
                .collect();
            HighlightsResponse {
                ok: true,
                title: highlights.title().to_string(),
                summary: highlights.summary(),
                file_name: highlights.export_file_name(),
                seed: (!highlights.is_empty()).then(|| compositor.seed()),
                message: if items.is_empty() {
                    EMPTY_MESSAGE.to_string()
                } else {
                    String::new()
                },
                items,
            }
        }
        Err(message) => HighlightsResponse {
            ok: false,
            title: String::new(),
            summary: String::new(),
            file_name: String::new(),
            items: Vec::new(),
            seed: None,
            message,
        },
    }
}

fn resolve_config() -> &'static FfiConfig {
    CONFIG.get_or_init(|| {
        let db_path = env_path("MEMOIR_DB_PATH")
            .unwrap_or_else(|| std::env::temp_dir().join(ENTRY_DB_FILE_NAME));
        let media_dir = env_path("MEMOIR_MEDIA_DIR")
            .unwrap_or_else(|| std::env::temp_dir().join(MEDIA_DIR_NAME));
        let media_base_url = env_value("MEMOIR_MEDIA_BASE_URL")
            .unwrap_or_else(|| format!("file://{}", media_dir.display()));
        FfiConfig {
            db_path,
            media_dir,
            media_base_url,
        }
    })
}

fn env_value(key: &str) -> Option<String> {
    let raw = std::env::var(key).ok()?;
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_value(key).map(PathBuf::from)
}

type FfiJournalService<'conn> =
    JournalService<SqliteEntryRepository<'conn>, LocalObjectStore, StaticSession>;

fn with_journal_service<T>(
    user_id: &str,
    access_token: Option<String>,
    f: impl FnOnce(&FfiJournalService<'_>) -> Result<T, JournalServiceError>,
) -> Result<T, String> {
    let config = resolve_config();
    let conn = open_db(&config.db_path).map_err(|err| format!("entry DB open failed: {err}"))?;
    let repo = SqliteEntryRepository::try_new(&conn)
        .map_err(|err| format!("entry repo init failed: {err}"))?;
    let store = LocalObjectStore::new(&config.media_dir, config.media_base_url.as_str());
    let session = StaticSession::new(
        Some(user_id.trim().to_string()),
        access_token.and_then(AccessToken::new),
    );
    let service = JournalService::new(repo, store, session);
    f(&service).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.user_message().to_string()
    })
}

fn drag_failure(message: String, photo_json: String) -> PhotoDragResponse {
    PhotoDragResponse {
        ok: false,
        photo_json,
        object_position: String::new(),
        mode_hint: String::new(),
        message,
    }
}

fn to_calendar_cell(cell: &DayCell<'_>) -> CalendarCellItem {
    match *cell {
        DayCell::Blank => CalendarCellItem {
            day: None,
            entry_id: None,
            mood: None,
            cover_url: None,
        },
        DayCell::Day { date, entry } => CalendarCellItem {
            day: Some(date.day()),
            entry_id: entry.map(|entry| entry.id.to_string()),
            mood: entry.map(|entry| entry.mood.as_str().to_string()),
            cover_url: entry
                .and_then(|entry| entry.cover_photo())
                .map(|photo| photo.url.clone()),
        },
    }
}
