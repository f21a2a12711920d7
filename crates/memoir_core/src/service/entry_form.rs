//! Entry edit-session state.
//!
//! # Responsibility
//! - Hold the editable fields of one day's entry, including the collage.
//! - Normalize free-form input when the entry is built for saving.
//!
//! # Invariants
//! - A blank title saves as `DEFAULT_TITLE`.
//! - Hashtags are the space-separated tokens starting with `#`.
//! - A blank song URL saves as absent.
//! - Editing an existing entry keeps its id and `created_at`.

use crate::layout::editor::CollageEditor;
use crate::model::entry::{
    format_hashtags, parse_hashtags, Entry, EntryId, VoiceNote, DEFAULT_TITLE,
};
use crate::model::mood::Mood;
use crate::model::song::SongLink;
use chrono::NaiveDate;

/// Form state for creating or editing the entry of one date.
#[derive(Debug, Clone)]
pub struct EntryForm {
    date: NaiveDate,
    existing: Option<(EntryId, i64)>,
    pub title: String,
    pub caption: String,
    /// Raw hashtag text as typed.
    pub hashtags_text: String,
    /// Raw song URL as typed.
    pub song_url: String,
    pub mood: Mood,
    voice_note: Option<VoiceNote>,
    editor: CollageEditor,
    submitting: bool,
}

impl EntryForm {
    /// Blank form for a day without an entry.
    pub fn new_for_date(date: NaiveDate) -> Self {
        Self {
            date,
            existing: None,
            title: String::new(),
            caption: String::new(),
            hashtags_text: String::new(),
            song_url: String::new(),
            mood: Mood::default(),
            voice_note: None,
            editor: CollageEditor::default(),
            submitting: false,
        }
    }

    /// Form pre-filled from a stored entry.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            date: entry.date,
            existing: Some((entry.id, entry.created_at)),
            title: entry.title.clone(),
            caption: entry.caption.clone(),
            hashtags_text: format_hashtags(&entry.hashtags),
            song_url: entry.song_url.clone().unwrap_or_default(),
            mood: entry.mood,
            voice_note: entry.voice_note.clone(),
            editor: CollageEditor::new(entry.photos.clone()),
            submitting: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    pub fn editor(&self) -> &CollageEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut CollageEditor {
        &mut self.editor
    }

    pub fn voice_note(&self) -> Option<&VoiceNote> {
        self.voice_note.as_ref()
    }

    pub fn set_voice_note(&mut self, note: VoiceNote) {
        self.voice_note = Some(note);
    }

    pub fn clear_voice_note(&mut self) -> Option<VoiceNote> {
        self.voice_note.take()
    }

    /// Advisory flag raised while a save is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub(crate) fn set_submitting(&mut self, submitting: bool) {
        self.submitting = submitting;
    }

    /// Parsed song link for the embedded player preview.
    pub fn song_link(&self) -> Option<SongLink> {
        SongLink::parse(&self.song_url)
    }

    /// Builds the entry to persist for `user_id`.
    pub fn to_entry(&self, user_id: &str, now_ms: i64) -> Entry {
        let mut entry = Entry::new(user_id, self.date, now_ms);
        if let Some((id, created_at)) = self.existing {
            entry.id = id;
            entry.created_at = created_at;
        }

        let title = self.title.trim();
        entry.title = if title.is_empty() {
            DEFAULT_TITLE.to_string()
        } else {
            title.to_string()
        };
        entry.caption = self.caption.clone();
        entry.photos = self.editor.photos().to_vec();
        entry.mood = self.mood;
        entry.hashtags = parse_hashtags(&self.hashtags_text);
        let song_url = self.song_url.trim();
        entry.song_url = (!song_url.is_empty()).then(|| song_url.to_string());
        entry.voice_note = self.voice_note.clone();
        entry
    }
}
