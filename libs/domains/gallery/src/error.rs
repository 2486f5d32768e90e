use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_events::EventError;
use domain_uploads::UploadError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Event lookup failed: {0}")]
    Event(String),

    #[error("Record query failed: {0}")]
    Records(String),

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to save {file_name}: {message}")]
    Save { file_name: String, message: String },

    /// Text-only records have nothing to download
    #[error("Record {0} has no image")]
    NoImage(Uuid),
}

pub type GalleryResult<T> = Result<T, GalleryError>;

impl From<EventError> for GalleryError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => GalleryError::EventNotFound(id),
            other => GalleryError::Event(other.to_string()),
        }
    }
}

impl From<UploadError> for GalleryError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::EventNotFound(id) => GalleryError::EventNotFound(id),
            other => GalleryError::Records(other.to_string()),
        }
    }
}

impl From<GalleryError> for AppError {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::EventNotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            GalleryError::Event(msg) | GalleryError::Records(msg) => AppError::DocumentStore(msg),
            GalleryError::Fetch { .. } | GalleryError::Save { .. } => {
                AppError::BlobStore(err.to_string())
            }
            GalleryError::NoImage(_) => AppError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
