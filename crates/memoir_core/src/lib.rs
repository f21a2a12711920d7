//! Core domain logic for Memoir, a day-by-day photo journal.
//! This crate is the single source of truth for journal invariants.

pub mod calendar;
pub mod capture;
pub mod db;
pub mod highlights;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod session;
pub mod storage;

pub use calendar::{CalendarState, MonthCursor, ViewMode};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use highlights::{Highlights, HighlightsCompositor};
pub use layout::editor::CollageEditor;
pub use layout::gesture::{DragMode, GestureEvent};
pub use layout::template::{select_layout, CollageLayout, LayoutKind};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entry::{Entry, EntryId, EntryValidationError, VoiceNote};
pub use model::mood::Mood;
pub use model::photo::{FrameOffset, PanOffset, Photo};
pub use repo::entry_repo::{
    EntryListQuery, EntryRepository, RepoError, RepoResult, SqliteEntryRepository,
};
pub use service::{EntryForm, JournalService, JournalServiceError};
pub use session::{AccessToken, SessionProvider, StaticSession};
pub use storage::{LocalObjectStore, MediaBlob, MediaBucket, ObjectStore, StorageError};

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
