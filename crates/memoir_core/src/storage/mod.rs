//! Media object storage contract.
//!
//! # Responsibility
//! - Name buckets and build user-scoped object paths.
//! - Map public URLs back to object paths for deletion.
//! - Define the `ObjectStore` collaborator used for photo and voice uploads.
//!
//! # Invariants
//! - Object paths are `<user_id>/<epoch_ms>-<suffix>.<ext>`.
//! - Stored paths never contain `..` segments or absolute prefixes.

use crate::session::AccessToken;
use rand::Rng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod local;

pub use local::LocalObjectStore;

const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 6;
const FALLBACK_EXTENSION: &str = "bin";

pub type StorageResult<T> = Result<T, StorageError>;

/// Destination bucket for uploaded media.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaBucket {
    Photos,
    VoiceNotes,
}

impl MediaBucket {
    pub fn as_str(self) -> &'static str {
        match self {
            MediaBucket::Photos => "photos",
            MediaBucket::VoiceNotes => "voice-notes",
        }
    }
}

/// File selected or captured for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaBlob {
    /// Original file name; only its extension is kept.
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl MediaBlob {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Object store failure.
#[derive(Debug)]
pub enum StorageError {
    Unauthorized,
    InvalidPath(String),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => write!(f, "object store rejected the access token"),
            Self::InvalidPath(path) => write!(f, "invalid object path `{path}`"),
            Self::Io { path, source } => {
                write!(f, "object store io failure at `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Unauthorized | Self::InvalidPath(_) => None,
        }
    }
}

/// Remote object store collaborator.
pub trait ObjectStore {
    /// Stores `blob` under a user-scoped path and returns its public URL.
    fn upload(
        &self,
        blob: &MediaBlob,
        bucket: MediaBucket,
        user_id: &str,
        token: &AccessToken,
    ) -> StorageResult<String>;

    /// Removes the object behind a public URL produced by `upload`.
    ///
    /// URLs outside `bucket` are ignored.
    fn delete(&self, url: &str, bucket: MediaBucket, token: &AccessToken) -> StorageResult<()>;
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn upload(
        &self,
        blob: &MediaBlob,
        bucket: MediaBucket,
        user_id: &str,
        token: &AccessToken,
    ) -> StorageResult<String> {
        (**self).upload(blob, bucket, user_id, token)
    }

    fn delete(&self, url: &str, bucket: MediaBucket, token: &AccessToken) -> StorageResult<()> {
        (**self).delete(url, bucket, token)
    }
}

/// Builds `<user_id>/<epoch_ms>-<suffix>.<ext>` for an upload.
pub fn object_path(user_id: &str, file_name: &str, epoch_ms: i64, suffix: &str) -> String {
    format!("{user_id}/{epoch_ms}-{suffix}.{}", file_extension(file_name))
}

/// Random lowercase base36 suffix used to keep same-millisecond uploads apart.
pub fn random_suffix(rng: &mut impl Rng) -> String {
    (0..SUFFIX_LEN)
        .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
        .collect()
}

/// Extracts the object path from a public URL by splitting on `/<bucket>/`.
pub fn public_path_from_url(url: &str, bucket: MediaBucket) -> Option<&str> {
    let marker = format!("/{}/", bucket.as_str());
    url.split_once(marker.as_str())
        .map(|(_, path)| path)
        .filter(|path| !path.is_empty())
}

/// Rejects empty, absolute, or parent-traversing relative paths.
pub fn validate_object_path(path: &str) -> StorageResult<()> {
    let invalid = path.is_empty()
        || path.starts_with('/')
        || path.contains('\\')
        || path
            .split('/')
            .any(|segment| segment.is_empty() || segment == "." || segment == "..");
    if invalid {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_ascii_lowercase)
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}
