//! # Image Bucket
//!
//! Product images uploaded from the admin dashboard, stored on disk and
//! served back under a public URL prefix.
//!
//! ```text
//! <image_dir>/
//! └── parts/
//!     ├── 3f9c0a6e41c84d0b9e3b5a0c7d2f1e88-1718035200123.png
//!     └── …
//!
//! public URL = <public_image_base_url>/parts/<name>
//! ```

use std::path::{Component, Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use bellows_core::validation::validate_image_extension;

use crate::error::{ApiError, ApiResult};

const PARTS_PREFIX: &str = "parts";

/// Where an uploaded image ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredImage {
    /// Object key relative to the bucket root, e.g. `parts/<random>-<millis>.png`.
    pub key: String,
    pub public_url: String,
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        ImageStore {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Stores an upload under a fresh key.
    ///
    /// ## Returns
    /// * `Err(ValidationError)` - not png/jpg/jpeg/gif/webp, or empty
    /// * `Err(StorageError)` - the bucket is not writable
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> ApiResult<StoredImage> {
        let extension = validate_image_extension(file_name)?;
        if bytes.is_empty() {
            return Err(ApiError::validation("Image upload is empty"));
        }

        let key = format!(
            "{}/{}-{}.{}",
            PARTS_PREFIX,
            Uuid::new_v4().simple(),
            Utc::now().timestamp_millis(),
            extension
        );
        let path = self.root.join(&key);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::storage(format!("Image bucket unavailable: {}", e)))?;
        }
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| ApiError::storage(format!("Image could not be stored: {}", e)))?;

        info!(key = %key, size = bytes.len(), "Product image stored");

        Ok(StoredImage {
            public_url: self.public_url(&key),
            key,
        })
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url, key)
    }

    /// Maps an object key to a file path; `None` for anything that would
    /// leave the bucket.
    pub fn resolve(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let inside = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));

        inside.then(|| self.root.join(relative))
    }

    /// Reads a stored object.
    pub async fn read(&self, key: &str) -> ApiResult<Vec<u8>> {
        let path = self
            .resolve(key)
            .ok_or_else(|| ApiError::not_found("Image", key))?;

        tokio::fs::read(&path).await.map_err(|e| {
            debug!(key = %key, error = %e, "Image read failed");
            ApiError::not_found("Image", key)
        })
    }

    /// Writes and removes a throwaway object.
    pub async fn probe(&self) -> ApiResult<()> {
        let dir = self.root.join(PARTS_PREFIX);
        let path = dir.join(format!(".probe-{}", Uuid::new_v4().simple()));

        let result = async {
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(&path, b"probe").await?;
            tokio::fs::remove_file(&path).await
        }
        .await;

        result.map_err(|e| ApiError::storage(format!("Image bucket is not writable: {}", e)))
    }
}

/// Content type for a stored object, by extension.
pub fn content_type(key: &str) -> &'static str {
    let extension = key
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn temp_store() -> ImageStore {
        let root = std::env::temp_dir().join(format!("bellows-images-{}", Uuid::new_v4()));
        ImageStore::new(root, "http://localhost:8080/images/")
    }

    #[tokio::test]
    async fn test_save_and_read_back() {
        let store = temp_store();
        let stored = store.save("Flange Photo.PNG", b"\x89PNG fake").await.unwrap();

        assert!(stored.key.starts_with("parts/"));
        assert!(stored.key.ends_with(".png"));
        assert_eq!(
            stored.public_url,
            format!("http://localhost:8080/images/{}", stored.key)
        );
        assert_eq!(store.read(&stored.key).await.unwrap(), b"\x89PNG fake");

        let second = store.save("other.png", b"x").await.unwrap();
        assert_ne!(stored.key, second.key);

        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_unsupported_and_empty_uploads() {
        let store = temp_store();

        let err = store.save("drawing.pdf", b"%PDF").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = store.save("photo.jpg", b"").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_resolve_stays_inside_bucket() {
        let store = ImageStore::new("/srv/images", "http://x/images");
        assert_eq!(
            store.resolve("parts/a.png"),
            Some(PathBuf::from("/srv/images/parts/a.png"))
        );
        assert_eq!(store.resolve("../etc/passwd"), None);
        assert_eq!(store.resolve("parts/../../secret"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve(""), None);
    }

    #[tokio::test]
    async fn test_probe() {
        let store = temp_store();
        store.probe().await.unwrap();

        let mut entries = tokio::fs::read_dir(store.root().join("parts")).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
        tokio::fs::remove_dir_all(store.root()).await.unwrap();
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("parts/a.JPG"), "image/jpeg");
        assert_eq!(content_type("parts/a.webp"), "image/webp");
        assert_eq!(content_type("parts/a"), "application/octet-stream");
    }
}
