//! Resolving image references into bytes.
//!
//! The editor never blocks on I/O: a supplier hands back a future that the
//! host polls once per frame through [`PendingImage::poll`].

use std::collections::HashMap;

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EditorError, EditorResult};

pub const BLOB_SCHEME: &str = "blob:";
pub const FILE_SCHEME: &str = "file://";

/// What the surrounding application asks the editor to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub url: String,
    pub prompt: Option<String>,
}

impl ImageRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }
}

pub type ImageFuture = BoxFuture<'static, EditorResult<Vec<u8>>>;

/// Turns an image URL into encoded bytes.
pub trait ImageSupplier {
    fn fetch(&self, url: &str) -> ImageFuture;
}

/// A load in flight.
pub struct PendingImage {
    url: String,
    future: ImageFuture,
}

impl std::fmt::Debug for PendingImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingImage").field("url", &self.url).finish()
    }
}

impl PendingImage {
    pub fn new(url: impl Into<String>, future: ImageFuture) -> Self {
        Self {
            url: url.into(),
            future,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Polls once without blocking. `None` while the bytes are not ready.
    /// Must not be called again after it returned `Some`.
    pub fn poll(&mut self) -> Option<EditorResult<Vec<u8>>> {
        self.future.as_mut().now_or_never()
    }
}

/// Reads local files on a background thread. Accepts plain paths and
/// `file://` URLs.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct FileSupplier;

#[cfg(not(target_arch = "wasm32"))]
impl ImageSupplier for FileSupplier {
    fn fetch(&self, url: &str) -> ImageFuture {
        let path = match url.strip_prefix(FILE_SCHEME) {
            Some(path) => path.to_owned(),
            None if url.starts_with(BLOB_SCHEME) || url.contains("://") => {
                return future::ready(Err(EditorError::UnsupportedSource(url.to_owned()))).boxed();
            }
            None => url.to_owned(),
        };

        let (sender, receiver) = futures::channel::oneshot::channel();
        std::thread::spawn(move || {
            let result = std::fs::read(&path)
                .map_err(|err| EditorError::ImageLoad(format!("{path}: {err}")));
            // The editor may have moved on to another image
            let _ = sender.send(result);
        });

        async move { receiver.await.map_err(|_| EditorError::LoadCancelled)? }.boxed()
    }
}

/// In-memory images addressed by `blob:` URLs, e.g. dropped files or
/// images handed over by another view.
#[derive(Debug, Default, Clone)]
pub struct BlobSupplier {
    blobs: HashMap<String, Vec<u8>>,
}

impl BlobSupplier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `bytes` under a fresh `blob:` URL and returns it.
    pub fn insert(&mut self, bytes: Vec<u8>) -> String {
        let url = format!("{BLOB_SCHEME}{}", Uuid::new_v4());
        self.blobs.insert(url.clone(), bytes);
        url
    }

    pub fn remove(&mut self, url: &str) -> Option<Vec<u8>> {
        self.blobs.remove(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.blobs.contains_key(url)
    }
}

impl ImageSupplier for BlobSupplier {
    fn fetch(&self, url: &str) -> ImageFuture {
        let result = if !url.starts_with(BLOB_SCHEME) {
            Err(EditorError::UnsupportedSource(url.to_owned()))
        } else {
            self.blobs
                .get(url)
                .cloned()
                .ok_or_else(|| EditorError::ImageLoad(format!("unknown blob {url}")))
        };
        future::ready(result).boxed()
    }
}

/// Routes `blob:` URLs to in-memory images and everything else to the
/// local file system where there is one.
#[derive(Debug, Default)]
pub struct ImageSources {
    blobs: BlobSupplier,
    #[cfg(not(target_arch = "wasm32"))]
    files: FileSupplier,
}

impl ImageSources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blobs_mut(&mut self) -> &mut BlobSupplier {
        &mut self.blobs
    }
}

impl ImageSupplier for ImageSources {
    fn fetch(&self, url: &str) -> ImageFuture {
        if url.starts_with(BLOB_SCHEME) {
            return self.blobs.fetch(url);
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            self.files.fetch(url)
        }
        #[cfg(target_arch = "wasm32")]
        {
            future::ready(Err(EditorError::UnsupportedSource(url.to_owned()))).boxed()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_blob_round_trip() {
        let mut blobs = BlobSupplier::new();
        let url = blobs.insert(vec![1, 2, 3]);
        assert!(url.starts_with(BLOB_SCHEME));
        assert_eq!(block_on(blobs.fetch(&url)).unwrap(), vec![1, 2, 3]);

        assert!(matches!(
            block_on(blobs.fetch("blob:missing")),
            Err(EditorError::ImageLoad(_))
        ));
        assert!(matches!(
            block_on(blobs.fetch("https://example.com/a.png")),
            Err(EditorError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_pending_image_is_ready_immediately_for_blobs() {
        let mut blobs = BlobSupplier::new();
        let url = blobs.insert(vec![7]);
        let mut pending = PendingImage::new(url.clone(), blobs.fetch(&url));
        assert_eq!(pending.url(), url);
        assert_eq!(pending.poll().unwrap().unwrap(), vec![7]);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_supplier_reads_paths_and_file_urls() {
        let path = std::env::temp_dir().join(format!("mask-editor-{}.bin", Uuid::new_v4()));
        std::fs::write(&path, b"bytes").unwrap();
        let path = path.to_string_lossy().into_owned();

        assert_eq!(block_on(FileSupplier.fetch(&path)).unwrap(), b"bytes");
        let url = format!("{FILE_SCHEME}{path}");
        assert_eq!(block_on(FileSupplier.fetch(&url)).unwrap(), b"bytes");
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(block_on(FileSupplier.fetch(&path)), Err(EditorError::ImageLoad(_))));
        assert!(matches!(
            block_on(FileSupplier.fetch("blob:abc")),
            Err(EditorError::UnsupportedSource(_))
        ));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_sources_route_by_scheme() {
        let mut sources = ImageSources::new();
        let url = sources.blobs_mut().insert(vec![4, 2]);
        assert_eq!(block_on(sources.fetch(&url)).unwrap(), vec![4, 2]);

        let missing = std::env::temp_dir().join(format!("mask-editor-missing-{}.png", Uuid::new_v4()));
        assert!(matches!(
            block_on(sources.fetch(&missing.to_string_lossy())),
            Err(EditorError::ImageLoad(_))
        ));
    }
}
