//! # Asset Loader
//!
//! Fetches the raw bytes of images placed in a document: `http(s)://` URLs
//! over the network, anything else (`file://` or a plain path) from disk.
//! Decoding is the drawing surface's job.
//!
//! Local reads are confined to the loader's local root. Without one, every
//! non-URL reference is refused.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use tracing::debug;
use url::Url;

use crate::error::{QuoteError, QuoteResult};

#[derive(Debug, Clone)]
pub struct AssetLoader {
    client: reqwest::Client,
    local_root: Option<PathBuf>,
}

impl AssetLoader {
    pub fn new(timeout: Duration) -> QuoteResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(AssetLoader {
            client,
            local_root: None,
        })
    }

    /// Allows local references, resolved under `root`.
    pub fn local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = Some(root.into());
        self
    }

    /// Loads one asset. Every failure is reported as [`QuoteError::Asset`].
    pub async fn load(&self, reference: &str) -> QuoteResult<Vec<u8>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(QuoteError::asset(reference, "empty reference"));
        }

        debug!(reference = %reference, "Loading asset");

        match Url::parse(reference) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => self.fetch(url).await,
            Ok(url) if url.scheme() == "file" => {
                let path = url
                    .to_file_path()
                    .map_err(|_| QuoteError::asset(reference, "not a local file path"))?;
                self.read_local(reference, &path).await
            }
            _ => self.read_local(reference, Path::new(reference)).await,
        }
    }

    async fn read_local(&self, reference: &str, path: &Path) -> QuoteResult<Vec<u8>> {
        let root = self
            .local_root
            .as_deref()
            .ok_or_else(|| QuoteError::asset(reference, "local files are not allowed"))?;
        let path = confine(root, path)
            .ok_or_else(|| QuoteError::asset(reference, "outside the image directory"))?;

        tokio::fs::read(&path)
            .await
            .map_err(|e| QuoteError::asset(reference, e))
    }

    async fn fetch(&self, url: Url) -> QuoteResult<Vec<u8>> {
        let reference = url.to_string();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| QuoteError::asset(&reference, e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| QuoteError::asset(&reference, e))?;

        Ok(bytes.to_vec())
    }
}

/// Resolves `path` under `root`. Relative paths are joined to the root;
/// absolute ones must already lie inside it. `..` is never accepted.
fn confine(root: &Path, path: &Path) -> Option<PathBuf> {
    let relative = if path.is_absolute() {
        path.strip_prefix(root).ok()?
    } else {
        path
    };

    let mut resolved = root.to_path_buf();
    for component in relative.components() {
        match component {
            Component::Normal(part) => resolved.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }

    (resolved != root).then_some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::get, Router};

    async fn spawn_server() -> String {
        let app = Router::new()
            .route("/logo.png", get(|| async { vec![1u8, 2, 3] }))
            .route("/missing.png", get(|| async { StatusCode::NOT_FOUND }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn loader() -> AssetLoader {
        AssetLoader::new(Duration::from_secs(2)).unwrap()
    }

    fn asset_dir() -> PathBuf {
        std::env::temp_dir().join(format!("bellows-assets-{}", std::process::id()))
    }

    #[tokio::test]
    async fn test_fetch_remote_asset() {
        let base = spawn_server().await;
        let bytes = loader().load(&format!("{base}/logo.png")).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_http_error_status_is_asset_error() {
        let base = spawn_server().await;
        let err = loader().load(&format!("{base}/missing.png")).await.unwrap_err();
        assert!(matches!(err, QuoteError::Asset { .. }));
    }

    #[tokio::test]
    async fn test_local_file_and_missing_file() {
        let dir = asset_dir().join("local");
        tokio::fs::create_dir_all(dir.join("parts")).await.unwrap();
        let path = dir.join("parts").join("photo.bin");
        tokio::fs::write(&path, b"abc").await.unwrap();

        let loader = loader().local_root(&dir);
        assert_eq!(loader.load(path.to_str().unwrap()).await.unwrap(), b"abc");
        assert_eq!(loader.load("parts/photo.bin").await.unwrap(), b"abc");

        tokio::fs::remove_file(&path).await.unwrap();
        assert!(matches!(
            loader.load(path.to_str().unwrap()).await,
            Err(QuoteError::Asset { .. })
        ));
        assert!(loader.load("   ").await.is_err());

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_local_reads_stay_inside_root() {
        let base = asset_dir().join("confined");
        let root = base.join("root");
        tokio::fs::create_dir_all(&root).await.unwrap();
        let outside = base.join("secret.txt");
        tokio::fs::write(&outside, b"secret").await.unwrap();

        let confined = loader().local_root(&root);
        for reference in [
            outside.to_str().unwrap().to_string(),
            "../secret.txt".to_string(),
            format!("{}/../secret.txt", root.display()),
            format!("file://{}", outside.display()),
        ] {
            assert!(
                matches!(confined.load(&reference).await, Err(QuoteError::Asset { .. })),
                "{reference} was read"
            );
        }

        // No root configured: nothing local is read at all.
        assert!(loader().load(outside.to_str().unwrap()).await.is_err());

        tokio::fs::remove_dir_all(&base).await.unwrap();
    }

    #[test]
    fn test_confine() {
        let root = Path::new("/srv/images");
        assert_eq!(
            confine(root, Path::new("parts/a.png")),
            Some(PathBuf::from("/srv/images/parts/a.png"))
        );
        assert_eq!(
            confine(root, Path::new("/srv/images/parts/a.png")),
            Some(PathBuf::from("/srv/images/parts/a.png"))
        );
        assert_eq!(confine(root, Path::new("/etc/passwd")), None);
        assert_eq!(confine(root, Path::new("parts/../../etc/passwd")), None);
        assert_eq!(confine(root, Path::new("/srv/images")), None);
    }
}
