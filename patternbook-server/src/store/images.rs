//! Image file store
//!
//! Uploads are written to a temp name first and only renamed into place
//! after the database row exists and carries the final file name. A crash
//! in between leaves a temp file to sweep up, never a row pointing at a
//! file that was never written.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::fs;

/// File store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored file name: {name}")]
    InvalidName { name: String },
}

/// Counter distinguishing temp files staged within the same process.
static STAGE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Store for uploaded image files, rooted at the uploads directory.
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The stored file name for an image row: derived from the generated
    /// image id, so names never collide and never depend on client input.
    pub fn file_name(amigurumi_id: i64, image_id: i64, extension: &str) -> String {
        format!("amigurumi_{amigurumi_id}_image_{image_id}.{extension}")
    }

    /// Extract a safe lowercase extension from an uploaded file name.
    /// Anything unusable falls back to "bin".
    pub fn extension_of(file_name: &str) -> String {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        if !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            ext
        } else {
            "bin".to_string()
        }
    }

    /// Write upload bytes to a temp file inside the uploads directory.
    /// Returns the temp path for a later `commit` or `discard`.
    pub async fn stage(&self, data: &[u8]) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.root).await?;

        let stamp = STAGE_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp = self
            .root
            .join(format!(".upload-{}-{}.tmp", std::process::id(), stamp));
        fs::write(&tmp, data).await?;
        Ok(tmp)
    }

    /// Rename a staged temp file to its final stored name.
    pub async fn commit(&self, tmp: &Path, file_name: &str) -> Result<(), StoreError> {
        fs::rename(tmp, self.resolve(file_name)?).await?;
        Ok(())
    }

    /// Remove a staged temp file after a failed upload. Removal failures
    /// are logged, not propagated; the original error matters more.
    pub async fn discard(&self, tmp: &Path) {
        if let Err(e) = fs::remove_file(tmp).await {
            tracing::warn!("failed to remove staged upload {}: {}", tmp.display(), e);
        }
    }

    /// Remove a stored file. A missing file is an error: the row said the
    /// file was there.
    pub async fn remove(&self, file_name: &str) -> Result<(), StoreError> {
        fs::remove_file(self.resolve(file_name)?).await?;
        Ok(())
    }

    /// Resolve a stored name inside the root, refusing path separators.
    fn resolve(&self, file_name: &str) -> Result<PathBuf, StoreError> {
        if file_name.is_empty()
            || file_name.contains('/')
            || file_name.contains('\\')
            || file_name.contains("..")
        {
            return Err(StoreError::InvalidName {
                name: file_name.to_string(),
            });
        }
        Ok(self.root.join(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_derive_from_ids() {
        assert_eq!(
            ImageStore::file_name(3, 17, "png"),
            "amigurumi_3_image_17.png"
        );
    }

    #[test]
    fn extension_extraction() {
        assert_eq!(ImageStore::extension_of("bear.PNG"), "png");
        assert_eq!(ImageStore::extension_of("photo.jpeg"), "jpeg");
        assert_eq!(ImageStore::extension_of("no-extension"), "bin");
        assert_eq!(ImageStore::extension_of("weird.p/ng"), "bin");
    }

    #[tokio::test]
    async fn stage_commit_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());

        let tmp = store.stage(b"image bytes").await.expect("stage");
        assert!(tmp.exists());

        store.commit(&tmp, "amigurumi_1_image_1.png").await.expect("commit");
        assert!(!tmp.exists());

        let stored = dir.path().join("amigurumi_1_image_1.png");
        assert_eq!(std::fs::read(stored).expect("read"), b"image bytes");
    }

    #[tokio::test]
    async fn discard_removes_temp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());

        let tmp = store.stage(b"bytes").await.expect("stage");
        store.discard(&tmp).await;
        assert!(!tmp.exists());
    }

    #[tokio::test]
    async fn remove_missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());

        let err = store.remove("amigurumi_1_image_9.png").await.unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }

    #[tokio::test]
    async fn refuses_path_traversal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = ImageStore::new(dir.path());

        let err = store.remove("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidName { .. }));
    }
}
