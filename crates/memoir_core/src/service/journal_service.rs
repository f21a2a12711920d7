//! Journal use-case service.
//!
//! # Responsibility
//! - Orchestrate session, entry store and object store into the journal
//!   use-cases: load, save, delete, media upload and highlights.
//! - Translate collaborator failures into user-facing error classes.
//!
//! # Invariants
//! - Every write requires a signed-in user and an access token.
//! - Saving upserts by `(user, date)` and returns the read-back record.
//! - Photo batches upload all-or-nothing; a failed batch leaves the form
//!   untouched and removes the objects it already stored.
//! - Media cleanup after delete is best-effort and never fails the delete.
//! - No call is retried automatically.

use crate::calendar::{entries_in_month, entries_in_year, MonthCursor};
use crate::capture::{CaptureDevice, CaptureError, CapturedAudio, Recording};
use crate::highlights::{Highlights, HighlightsCompositor};
use crate::logging::LogEvent;
use crate::model::entry::{Entry, EntryId, EntryValidationError, VoiceNote};
use crate::model::photo::Photo;
use crate::repo::entry_repo::{EntryListQuery, EntryRepository, RepoError};
use crate::service::entry_form::EntryForm;
use crate::session::{AccessToken, SessionProvider};
use crate::storage::{MediaBlob, MediaBucket, ObjectStore, StorageError};
use chrono::{NaiveDate, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Service error for journal use-cases.
#[derive(Debug)]
pub enum JournalServiceError {
    /// No signed-in user or no access token.
    AuthUnavailable,
    /// Entry store failure.
    Repo(RepoError),
    /// Object store failure while uploading media.
    Upload(StorageError),
    /// Microphone permission refused.
    CaptureDenied,
    /// Other capture device failure.
    Capture(CaptureError),
    Validation(EntryValidationError),
    EntryNotFound(EntryId),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl JournalServiceError {
    /// Alert text shown to the user for this failure class.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AuthUnavailable => "Please sign in again to continue.",
            Self::Repo(_) | Self::InconsistentState(_) => "Failed to save entry. Please try again.",
            Self::Upload(_) => "Failed to upload media. Please try again.",
            Self::CaptureDenied => "Could not access microphone.",
            Self::Capture(_) => "Recording failed. Please try again.",
            Self::Validation(_) => "Some entry details are invalid.",
            Self::EntryNotFound(_) => "This entry no longer exists.",
        }
    }
}

impl Display for JournalServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthUnavailable => write!(f, "authentication unavailable"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Upload(err) => write!(f, "media upload failed: {err}"),
            Self::CaptureDenied => write!(f, "microphone permission denied"),
            Self::Capture(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::InconsistentState(details) => write!(f, "inconsistent entry state: {details}"),
        }
    }
}

impl Error for JournalServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Upload(err) => Some(err),
            Self::Capture(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for JournalServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::EntryNotFound(id),
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

impl From<EntryValidationError> for JournalServiceError {
    fn from(value: EntryValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StorageError> for JournalServiceError {
    fn from(value: StorageError) -> Self {
        Self::Upload(value)
    }
}

impl From<CaptureError> for JournalServiceError {
    fn from(value: CaptureError) -> Self {
        match value {
            CaptureError::PermissionDenied => Self::CaptureDenied,
            other => Self::Capture(other),
        }
    }
}

pub type JournalResult<T> = Result<T, JournalServiceError>;

/// Journal facade over the entry store, object store and session.
pub struct JournalService<R: EntryRepository, S: ObjectStore, P: SessionProvider> {
    repo: R,
    store: S,
    session: P,
}

impl<R: EntryRepository, S: ObjectStore, P: SessionProvider> JournalService<R, S, P> {
    pub fn new(repo: R, store: S, session: P) -> Self {
        Self {
            repo,
            store,
            session,
        }
    }

    /// All entries of the signed-in user, newest date first.
    ///
    /// Returns an empty list when nobody is signed in.
    pub fn load_entries(&self) -> JournalResult<Vec<Entry>> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(Vec::new());
        };
        let entries = self.repo.list_entries(&EntryListQuery::for_user(user_id))?;
        info!(
            "{}",
            LogEvent::new("entries_load", "service", "ok").field("count", entries.len())
        );
        Ok(entries)
    }

    pub fn entry_for_date(&self, date: NaiveDate) -> JournalResult<Option<Entry>> {
        let Some(user_id) = self.session.user_id() else {
            return Ok(None);
        };
        Ok(self.repo.get_entry_by_date(&user_id, date)?)
    }

    /// Upserts `entry` for the signed-in user and returns the stored record.
    pub fn save_entry(&self, mut entry: Entry) -> JournalResult<Entry> {
        let (user_id, _token) = self.require_auth()?;
        entry.user_id = user_id;
        entry.validate()?;

        let stored_id = self.repo.upsert_entry(&entry).map_err(|err| {
            warn!(
                "{}",
                LogEvent::new("entry_save", "service", "error").field("error", &err)
            );
            JournalServiceError::from(err)
        })?;
        let stored = self
            .repo
            .get_entry(&entry.user_id, stored_id)?
            .ok_or(JournalServiceError::InconsistentState(
                "saved entry not found in read-back",
            ))?;
        info!(
            "{}",
            LogEvent::new("entry_save", "service", "ok")
                .field("photos", stored.photos.len())
                .field("voice_note", stored.voice_note.is_some())
        );
        Ok(stored)
    }

    /// Builds and saves the form's entry, holding `submitting` during the call.
    pub fn submit_form(&self, form: &mut EntryForm) -> JournalResult<Entry> {
        form.set_submitting(true);
        let result = self
            .require_auth()
            .and_then(|(user_id, _)| self.save_entry(form.to_entry(&user_id, now_ms())));
        form.set_submitting(false);
        result
    }

    /// Deletes an entry, then releases its media best-effort.
    pub fn delete_entry(&self, id: EntryId) -> JournalResult<()> {
        let (user_id, token) = self.require_auth()?;
        let entry = self
            .repo
            .get_entry(&user_id, id)?
            .ok_or(JournalServiceError::EntryNotFound(id))?;
        self.repo.delete_entry(&user_id, id)?;
        info!(
            "{}",
            LogEvent::new("entry_delete", "service", "ok")
                .field("photos", entry.photos.len())
                .field("voice_note", entry.voice_note.is_some())
        );

        for photo in &entry.photos {
            self.release_media(&photo.url, MediaBucket::Photos, &token);
        }
        if let Some(note) = &entry.voice_note {
            self.release_media(&note.url, MediaBucket::VoiceNotes, &token);
        }
        Ok(())
    }

    /// Uploads selected files and appends them to the form's collage.
    ///
    /// Only the first `remaining_slots` files are considered. Returns how many
    /// photos were added.
    pub fn upload_photos(
        &self,
        form: &mut EntryForm,
        files: Vec<MediaBlob>,
    ) -> JournalResult<usize> {
        let (user_id, token) = self.require_auth()?;
        let remaining = form.editor().remaining_slots();
        if files.len() > remaining {
            warn!(
                "{}",
                LogEvent::new("photo_upload", "service", "truncated")
                    .field("selected", files.len())
                    .field("accepted", remaining)
            );
        }

        let mut uploaded: Vec<String> = Vec::new();
        for blob in files.iter().take(remaining) {
            match self.store.upload(blob, MediaBucket::Photos, &user_id, &token) {
                Ok(url) => uploaded.push(url),
                Err(err) => {
                    warn!(
                        "{}",
                        LogEvent::new("photo_upload", "service", "error")
                            .field("uploaded", uploaded.len())
                            .field("error", &err)
                    );
                    for url in &uploaded {
                        self.release_media(url, MediaBucket::Photos, &token);
                    }
                    return Err(err.into());
                }
            }
        }

        let mut rng = rand::thread_rng();
        let photos: Vec<Photo> = uploaded
            .into_iter()
            .map(|url| Photo::with_random_tilt(url, &mut rng))
            .collect();
        let added = form.editor_mut().add_photos(photos);
        info!(
            "{}",
            LogEvent::new("photo_upload", "service", "ok").field("count", added)
        );
        Ok(added)
    }

    /// Uploads a captured clip and attaches it to the form.
    pub fn attach_voice_note(
        &self,
        form: &mut EntryForm,
        captured: &CapturedAudio,
    ) -> JournalResult<VoiceNote> {
        let (user_id, token) = self.require_auth()?;
        let url = self
            .store
            .upload(&captured.to_blob(), MediaBucket::VoiceNotes, &user_id, &token)
            .map_err(|err| {
                warn!(
                    "{}",
                    LogEvent::new("voice_upload", "service", "error").field("error", &err)
                );
                JournalServiceError::from(err)
            })?;

        let note = VoiceNote {
            id: Uuid::new_v4().simple().to_string(),
            url,
            duration: captured.duration_secs,
        };
        form.set_voice_note(note.clone());
        info!(
            "{}",
            LogEvent::new("voice_upload", "service", "ok").field("duration_secs", note.duration)
        );
        Ok(note)
    }

    /// Finishes an in-progress recording and attaches the clip.
    pub fn record_voice_note<D: CaptureDevice + ?Sized>(
        &self,
        form: &mut EntryForm,
        recording: Recording<'_, D>,
    ) -> JournalResult<VoiceNote> {
        let captured = recording.finish()?;
        self.attach_voice_note(form, &captured)
    }

    /// Highlights for one calendar month, titled `<Month> <year>`.
    pub fn month_highlights(
        &self,
        cursor: MonthCursor,
        compositor: &HighlightsCompositor,
    ) -> JournalResult<Highlights> {
        let entries = self.load_entries()?;
        Ok(compositor.compose(cursor.title(), entries_in_month(cursor, &entries)))
    }

    /// Highlights for one year, titled `<year> Recap`.
    pub fn year_highlights(
        &self,
        year: i32,
        compositor: &HighlightsCompositor,
    ) -> JournalResult<Highlights> {
        let entries = self.load_entries()?;
        Ok(compositor.compose(format!("{year} Recap"), entries_in_year(year, &entries)))
    }

    fn require_auth(&self) -> JournalResult<(String, AccessToken)> {
        let user_id = self.session.user_id();
        let token = self.session.access_token();
        match (user_id, token) {
            (Some(user_id), Some(token)) => Ok((user_id, token)),
            _ => {
                warn!(
                    "{}",
                    LogEvent::new("auth_check", "service", "error").field("reason", "unavailable")
                );
                Err(JournalServiceError::AuthUnavailable)
            }
        }
    }

    fn release_media(&self, url: &str, bucket: MediaBucket, token: &AccessToken) {
        if let Err(err) = self.store.delete(url, bucket, token) {
            warn!(
                "{}",
                LogEvent::new("media_release", "service", "error")
                    .field("bucket", bucket.as_str())
                    .field("error", &err)
            );
        }
    }
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
