//! Batch download of selected images

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::instrument;
use uuid::Uuid;

use domain_uploads::EventRecord;

use crate::error::{GalleryError, GalleryResult};

/// Fetches blob bytes by their public URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> GalleryResult<Bytes>;
}

/// Where downloaded files end up
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DownloadSink: Send + Sync {
    /// Save under `file_name` and return the written location
    async fn save(&self, file_name: &str, bytes: Bytes) -> GalleryResult<PathBuf>;
}

/// reqwest-backed fetcher
#[derive(Debug, Clone, Default)]
pub struct HttpBlobFetcher {
    client: Client,
}

impl HttpBlobFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobFetcher for HttpBlobFetcher {
    async fn fetch(&self, url: &str) -> GalleryResult<Bytes> {
        let fetch_error = |e: reqwest::Error| GalleryError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(fetch_error)?
            .error_for_status()
            .map_err(fetch_error)?;

        response.bytes().await.map_err(fetch_error)
    }
}

/// Writes files into one local directory
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl DownloadSink for DirectorySink {
    async fn save(&self, file_name: &str, bytes: Bytes) -> GalleryResult<PathBuf> {
        let save_error = |e: std::io::Error| GalleryError::Save {
            file_name: file_name.to_string(),
            message: e.to_string(),
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(save_error)?;
        let target = self.dir.join(file_name);
        tokio::fs::write(&target, &bytes).await.map_err(save_error)?;
        Ok(target)
    }
}

/// Local name for a stored `fileName`: the part after the last `/`
pub fn download_name(file_name: &str) -> String {
    file_name
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty() && *name != "..")
        .unwrap_or("download")
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFile {
    pub record_id: Uuid,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDownload {
    pub record_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub saved: Vec<SavedFile>,
    pub failed: Vec<FailedDownload>,
}

/// Fetch and save each record in order. A failing record is reported
/// and the rest still run.
#[instrument(skip_all, fields(count = records.len()))]
pub async fn download_records(
    records: &[&EventRecord],
    fetcher: &dyn BlobFetcher,
    sink: &dyn DownloadSink,
) -> DownloadReport {
    let mut report = DownloadReport::default();

    for record in records {
        match download_one(record, fetcher, sink).await {
            Ok(path) => report.saved.push(SavedFile {
                record_id: record.id,
                path,
            }),
            Err(e) => {
                tracing::warn!(record_id = %record.id, error = %e, "Download failed");
                report.failed.push(FailedDownload {
                    record_id: record.id,
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        saved = report.saved.len(),
        failed = report.failed.len(),
        "Download finished"
    );
    report
}

async fn download_one(
    record: &EventRecord,
    fetcher: &dyn BlobFetcher,
    sink: &dyn DownloadSink,
) -> GalleryResult<PathBuf> {
    let (Some(url), Some(file_name)) = (record.url(), record.file_name()) else {
        return Err(GalleryError::NoImage(record.id));
    };
    let bytes = fetcher.fetch(url).await?;
    sink.save(&download_name(file_name), bytes).await
}
