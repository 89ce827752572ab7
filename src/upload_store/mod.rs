//! UploadStore - Image Upload Persistence
//!
//! ## Responsibilities
//!
//! - Sanitize client-supplied filenames (path components stripped)
//! - Uniquify stored names with a UUID suffix
//! - Save multipart payloads under the managed upload directories

use std::path::PathBuf;

use tokio::fs;
use uuid::Uuid;

use crate::error::Result;

/// A persisted upload
#[derive(Debug, Clone)]
pub struct SavedUpload {
    /// Full path on disk
    pub path: PathBuf,
    /// Stored filename (sanitized + unique)
    pub file_name: String,
}

/// UploadStore instance
pub struct UploadStore {
    /// Directory for classification uploads
    upload_dir: PathBuf,
    /// Directory for recycled-goods photos
    recycle_dir: PathBuf,
}

impl UploadStore {
    /// Create new UploadStore, creating the directories if they don't exist
    pub async fn new(upload_dir: PathBuf, recycle_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&upload_dir).await?;
        fs::create_dir_all(&recycle_dir).await?;

        Ok(Self {
            upload_dir,
            recycle_dir,
        })
    }

    /// Save a classification image upload
    pub async fn save_classify(&self, original_name: &str, data: &[u8]) -> Result<SavedUpload> {
        self.save_to(&self.upload_dir, original_name, data).await
    }

    /// Save a recycled-goods photo upload
    pub async fn save_recycle(&self, original_name: &str, data: &[u8]) -> Result<SavedUpload> {
        self.save_to(&self.recycle_dir, original_name, data).await
    }

    async fn save_to(&self, dir: &PathBuf, original_name: &str, data: &[u8]) -> Result<SavedUpload> {
        let file_name = unique_filename(original_name);
        let path = dir.join(&file_name);

        fs::write(&path, data).await?;

        tracing::debug!(
            file = %path.display(),
            size = data.len(),
            "Upload saved"
        );

        Ok(SavedUpload { path, file_name })
    }
}

/// Strip path components and replace unsafe characters.
///
/// Keeps alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_filename(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(name)
        .trim_start_matches('.');

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

/// Sanitized filename with a UUID inserted before the extension
pub fn unique_filename(original_name: &str) -> String {
    let sanitized = sanitize_filename(original_name);

    match sanitized.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            format!("{}_{}.{}", stem, Uuid::new_v4().simple(), ext)
        }
        _ => format!("{}_{}", sanitized, Uuid::new_v4().simple()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\temp\\leaf.jpg"), "leaf.jpg");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename("..."), "upload");
    }

    #[test]
    fn test_unique_keeps_extension() {
        let name = unique_filename("leaf.jpg");
        assert!(name.ends_with(".jpg"));
        assert!(name.starts_with("leaf_"));
        assert_ne!(unique_filename("leaf.jpg"), unique_filename("leaf.jpg"));
    }

    #[tokio::test]
    async fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(
            dir.path().join("uploads"),
            dir.path().join("recycle"),
        )
        .await
        .unwrap();

        let saved = store.save_classify("leaf.jpg", b"not-a-real-jpeg").await.unwrap();
        assert!(saved.path.exists());
        assert_eq!(tokio::fs::read(&saved.path).await.unwrap(), b"not-a-real-jpeg");

        let saved = store.save_recycle("plow.png", b"bytes").await.unwrap();
        assert!(saved.path.starts_with(dir.path().join("recycle")));
    }
}
