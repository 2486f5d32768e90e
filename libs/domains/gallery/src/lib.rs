//! Gallery Domain
//!
//! Read side of an event for its guests and owner. Records are split into
//! images (captioned or not) and text-only messages; images are grouped by
//! upload batch. The view layers a fullscreen lightbox and a download
//! selection on top.
//!
//! ```text
//! GalleryView ──load──► GalleryService ──► EventService + RecordRepository
//!   ├─ Lightbox (Grid <-> Fullscreen)
//!   └─ Selection ──download_selected──► BlobFetcher ──► DownloadSink
//! ```

use utoipa::OpenApi;

pub mod download;
pub mod error;
pub mod handlers;
pub mod lightbox;
pub mod model;
pub mod selection;
pub mod service;
pub mod view;

pub use download::{
    BlobFetcher, DirectorySink, DownloadReport, DownloadSink, FailedDownload, HttpBlobFetcher,
    SavedFile, download_name, download_records,
};
pub use error::{GalleryError, GalleryResult};
pub use lightbox::{Key, Lightbox, NavCommand, NavInput, SWIPE_MIN_DISTANCE, ViewMode};
pub use model::{Gallery, GalleryResponse, ImageGroup, Partition, group_images, partition};
pub use selection::Selection;
pub use service::GalleryService;
pub use view::GalleryView;

/// OpenAPI documentation for Gallery API
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_gallery),
    components(schemas(GalleryResponse, ImageGroup)),
    tags(
        (name = "gallery", description = "Event gallery")
    )
)]
pub struct ApiDoc;
