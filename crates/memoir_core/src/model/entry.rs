//! Journal entry aggregate.
//!
//! # Responsibility
//! - Define the one-per-day record composed of photos, voice note, song
//!   reference, caption, mood and hashtags.
//! - Validate aggregate invariants before persistence.
//!
//! # Invariants
//! - `date` is the natural key together with `user_id`.
//! - `photos.len() <= MAX_PHOTOS_PER_ENTRY`; order is display priority.
//! - Every hashtag starts with `#` and contains no whitespace.
//! - Photo ids are unique within one entry.

use crate::model::mood::Mood;
use crate::model::photo::Photo;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Upload is refused beyond this many photos per entry.
pub const MAX_PHOTOS_PER_ENTRY: usize = 6;
/// Title used when the user saves without one.
pub const DEFAULT_TITLE: &str = "Untitled Memory";
/// Storage format for entry dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Stable identifier of a stored entry row.
pub type EntryId = Uuid;

/// Recorded audio attached to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceNote {
    pub id: String,
    pub url: String,
    /// Whole seconds.
    pub duration: u32,
}

/// One journal entry for one calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub id: EntryId,
    pub user_id: String,
    pub date: NaiveDate,
    pub title: String,
    pub caption: String,
    pub photos: Vec<Photo>,
    pub mood: Mood,
    pub hashtags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub song_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_note: Option<VoiceNote>,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

/// Validation error for entry aggregate invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryValidationError {
    EmptyUserId,
    TooManyPhotos { count: usize },
    DuplicatePhotoId(String),
    InvalidHashtag(String),
}

impl Display for EntryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUserId => write!(f, "entry user_id cannot be empty"),
            Self::TooManyPhotos { count } => write!(
                f,
                "entry holds {count} photos; at most {MAX_PHOTOS_PER_ENTRY} are allowed"
            ),
            Self::DuplicatePhotoId(id) => write!(f, "duplicate photo id `{id}` in entry"),
            Self::InvalidHashtag(tag) => {
                write!(f, "invalid hashtag `{tag}`; hashtags must start with `#`")
            }
        }
    }
}

impl Error for EntryValidationError {}

impl Entry {
    /// Creates an empty entry for `date` with a generated id.
    pub fn new(user_id: impl Into<String>, date: NaiveDate, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            date,
            title: DEFAULT_TITLE.to_string(),
            caption: String::new(),
            photos: Vec::new(),
            mood: Mood::default(),
            hashtags: Vec::new(),
            song_url: None,
            voice_note: None,
            created_at,
        }
    }

    /// Validates aggregate invariants.
    pub fn validate(&self) -> Result<(), EntryValidationError> {
        if self.user_id.trim().is_empty() {
            return Err(EntryValidationError::EmptyUserId);
        }

        if self.photos.len() > MAX_PHOTOS_PER_ENTRY {
            return Err(EntryValidationError::TooManyPhotos {
                count: self.photos.len(),
            });
        }

        let mut seen = HashSet::new();
        for photo in &self.photos {
            if !seen.insert(photo.id.as_str()) {
                return Err(EntryValidationError::DuplicatePhotoId(photo.id.clone()));
            }
        }

        for tag in &self.hashtags {
            if !is_hashtag(tag) {
                return Err(EntryValidationError::InvalidHashtag(tag.clone()));
            }
        }

        Ok(())
    }

    /// Storage/display key, `YYYY-MM-DD`.
    pub fn date_key(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    /// First photo, used as calendar thumbnail and highlight sample.
    pub fn cover_photo(&self) -> Option<&Photo> {
        self.photos.first()
    }

    pub fn has_photos(&self) -> bool {
        !self.photos.is_empty()
    }

    /// How many more photos this entry accepts.
    pub fn remaining_photo_slots(&self) -> usize {
        MAX_PHOTOS_PER_ENTRY.saturating_sub(self.photos.len())
    }
}

/// Parses free-form hashtag input.
///
/// Splits on any whitespace and keeps only tokens starting with `#`.
pub fn parse_hashtags(input: &str) -> Vec<String> {
    input
        .split_whitespace()
        .filter(|token| is_hashtag(token))
        .map(str::to_string)
        .collect()
}

/// Joins hashtags back into editable text.
pub fn format_hashtags(tags: &[String]) -> String {
    tags.join(" ")
}

/// Parses a `YYYY-MM-DD` key.
pub fn parse_date_key(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok()
}

fn is_hashtag(token: &str) -> bool {
    token.starts_with('#') && !token.chars().any(char::is_whitespace)
}
