//! Uploads Domain
//!
//! Guest contributions to an event: photos (optionally captioned) and
//! text-only messages. Each photo is written to the blob store first and
//! only then recorded, so a record never points at a missing image.
//!
//! # Architecture
//!
//! ```text
//! UploadSession ──► UploadBackend (UploadService)
//!   tasks/previews        ├─► BlobStore (filesystem / memory)
//!                         └─► RecordRepository (Mongo / memory)
//! ```

use utoipa::OpenApi;

pub mod blob;
pub mod error;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;
pub mod session;

pub use blob::{
    BlobRef, BlobStore, BlobUrls, FsBlobStore, InMemoryBlobStore, StoredBlob, blob_path,
};
pub use error::{UploadError, UploadResult};
pub use models::{
    EventRecord, FailedUpload, FlatRecord, LocalFile, PostMessage, RecordContent, RecordKind,
    UploadOutcome,
};
pub use repository::{InMemoryRecordRepository, RecordRepository};
pub use self::mongodb::{MongoRecordRepository, RecordDocument};
pub use service::{UploadBackend, UploadService};
pub use session::{PreviewHandle, PreviewRegistry, TaskStatus, UploadSession, UploadSummary, UploadTask};

/// OpenAPI documentation for Uploads API
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::upload_photos,
        handlers::post_message,
        handlers::list_records,
    ),
    components(schemas(FlatRecord, RecordKind, PostMessage, FailedUpload, UploadOutcome)),
    tags(
        (name = "uploads", description = "Guest photo and message uploads")
    )
)]
pub struct ApiDoc;

/// OpenAPI documentation for the blob route, nested under `/api/blobs`
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_blob),
    tags(
        (name = "uploads", description = "Guest photo and message uploads")
    )
)]
pub struct BlobsApiDoc;
