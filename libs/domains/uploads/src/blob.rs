//! Blob storage for uploaded images

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UploadError, UploadResult};

/// Where a stored blob lives and how clients fetch it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobRef {
    pub path: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Object storage keyed by relative path
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> UploadResult<BlobRef>;

    async fn get(&self, path: &str) -> UploadResult<Option<StoredBlob>>;
}

/// `<eventId>/<unixMillis>-<recordId>-<fileName>`, with the file name reduced
/// to its base name so it cannot escape the event's folder. The record id
/// keeps same-named files of one batch apart.
pub fn blob_path(event_id: Uuid, unix_millis: i64, record_id: Uuid, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .unwrap_or("upload");
    format!("{}/{}-{}-{}", event_id, unix_millis, record_id, base)
}

/// Rejects absolute paths and `..` segments
pub fn validate_blob_path(path: &str) -> UploadResult<&str> {
    let trimmed = path.trim_start_matches('/');
    let safe = !trimmed.is_empty()
        && Path::new(trimmed)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if safe {
        Ok(trimmed)
    } else {
        Err(UploadError::InvalidBlobPath(path.to_string()))
    }
}

/// Public URL prefix for blobs served by the API
#[derive(Debug, Clone)]
pub struct BlobUrls {
    api_base: String,
}

impl BlobUrls {
    pub fn new(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/api/blobs/{}", self.api_base, path)
    }
}

/// Guess from the extension; used when the store keeps no metadata
pub fn content_type_for(path: &str) -> &'static str {
    let extension = path
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "avif" => "image/avif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// In-memory implementation of BlobStore (for development/testing)
#[derive(Debug, Clone)]
pub struct InMemoryBlobStore {
    urls: BlobUrls,
    blobs: Arc<RwLock<HashMap<String, StoredBlob>>>,
}

impl InMemoryBlobStore {
    pub fn new(urls: BlobUrls) -> Self {
        Self {
            urls,
            blobs: Arc::default(),
        }
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, path: &str, bytes: Bytes, content_type: &str) -> UploadResult<BlobRef> {
        let path = validate_blob_path(path)?.to_string();
        let blob = StoredBlob {
            bytes,
            content_type: content_type.to_string(),
        };
        self.blobs.write().await.insert(path.clone(), blob);

        Ok(BlobRef {
            url: self.urls.url_for(&path),
            path,
        })
    }

    async fn get(&self, path: &str) -> UploadResult<Option<StoredBlob>> {
        let path = validate_blob_path(path)?;
        Ok(self.blobs.read().await.get(path).cloned())
    }
}

/// Stores blobs as files under a root directory
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    urls: BlobUrls,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, urls: BlobUrls) -> Self {
        Self {
            root: root.into(),
            urls,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn put(&self, path: &str, bytes: Bytes, _content_type: &str) -> UploadResult<BlobRef> {
        let path = validate_blob_path(path)?;
        let target = self.root.join(path);

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        Ok(BlobRef {
            path: path.to_string(),
            url: self.urls.url_for(path),
        })
    }

    async fn get(&self, path: &str) -> UploadResult<Option<StoredBlob>> {
        let path = validate_blob_path(path)?;

        match tokio::fs::read(self.root.join(path)).await {
            Ok(bytes) => Ok(Some(StoredBlob {
                bytes: Bytes::from(bytes),
                content_type: content_type_for(path).to_string(),
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
