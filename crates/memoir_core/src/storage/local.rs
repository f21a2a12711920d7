//! Filesystem-backed object store.
//!
//! Objects live at `<root>/<bucket>/<path>` and are addressed publicly as
//! `<public_base_url>/<bucket>/<path>`.

use super::{
    object_path, public_path_from_url, random_suffix, validate_object_path, MediaBlob,
    MediaBucket, ObjectStore, StorageError, StorageResult,
};
use crate::logging::LogEvent;
use crate::session::AccessToken;
use chrono::Utc;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Object store writing into a local directory tree.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into();
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store whose public URLs are `file://` URLs under `root`.
    pub fn with_file_urls(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let base = format!("file://{}", root.display());
        Self::new(root, base)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem location of an object path inside `bucket`.
    pub fn object_file(&self, bucket: MediaBucket, path: &str) -> StorageResult<PathBuf> {
        validate_object_path(path)?;
        Ok(self.root.join(bucket.as_str()).join(path))
    }
}

impl ObjectStore for LocalObjectStore {
    fn upload(
        &self,
        blob: &MediaBlob,
        bucket: MediaBucket,
        user_id: &str,
        _token: &AccessToken,
    ) -> StorageResult<String> {
        let suffix = random_suffix(&mut rand::thread_rng());
        let path = object_path(
            user_id,
            &blob.file_name,
            Utc::now().timestamp_millis(),
            &suffix,
        );
        let file = self.object_file(bucket, &path)?;

        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).map_err(|source| StorageError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&file, &blob.bytes).map_err(|source| StorageError::Io {
            path: file.clone(),
            source,
        })?;

        info!(
            "{}",
            LogEvent::new("object_upload", "storage", "ok")
                .field("bucket", bucket.as_str())
                .field("bytes", blob.bytes.len())
        );
        Ok(format!(
            "{}/{}/{}",
            self.public_base_url,
            bucket.as_str(),
            path
        ))
    }

    fn delete(&self, url: &str, bucket: MediaBucket, _token: &AccessToken) -> StorageResult<()> {
        let Some(path) = public_path_from_url(url, bucket) else {
            warn!(
                "{}",
                LogEvent::new("object_delete", "storage", "skipped")
                    .field("bucket", bucket.as_str())
                    .field("reason", "foreign_url")
            );
            return Ok(());
        };

        let file = self.object_file(bucket, path)?;
        match std::fs::remove_file(&file) {
            Ok(()) => {
                info!(
                    "{}",
                    LogEvent::new("object_delete", "storage", "ok").field("bucket", bucket.as_str())
                );
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path: file, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LocalObjectStore;
    use crate::session::AccessToken;
    use crate::storage::{MediaBlob, MediaBucket, ObjectStore};

    #[test]
    fn upload_then_delete_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LocalObjectStore::new(dir.path(), "https://media.test/public/");
        let token = AccessToken::new("t").expect("token");

        let url = store
            .upload(
                &MediaBlob::new("cat.png", vec![1, 2, 3]),
                MediaBucket::Photos,
                "user-1",
                &token,
            )
            .expect("upload should succeed");
        assert!(url.starts_with("https://media.test/public/photos/user-1/"));
        assert!(url.ends_with(".png"));

        let path = url.split_once("/photos/").expect("bucket segment").1;
        let file = store
            .object_file(MediaBucket::Photos, path)
            .expect("valid path");
        assert_eq!(std::fs::read(&file).expect("stored bytes"), vec![1, 2, 3]);

        store
            .delete(&url, MediaBucket::Photos, &token)
            .expect("delete should succeed");
        assert!(!file.exists());
        store
            .delete(&url, MediaBucket::Photos, &token)
            .expect("deleting twice is a no-op");
    }

    #[test]
    fn delete_rejects_traversal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = LocalObjectStore::new(dir.path(), "https://media.test");
        let token = AccessToken::new("t").expect("token");
        let result = store.delete(
            "https://media.test/photos/../../secret",
            MediaBucket::Photos,
            &token,
        );
        assert!(result.is_err());
    }
}
