use axum::extract::multipart::MultipartError;
use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_events::EventError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Event not found: {0}")]
    EventNotFound(Uuid),

    #[error("Upload task not found: {0}")]
    TaskNotFound(Uuid),

    #[error("Upload task {0} is still uploading")]
    TaskBusy(Uuid),

    #[error("Only images can be uploaded, got '{0}'")]
    UnsupportedContentType(String),

    #[error("File '{0}' is empty")]
    EmptyFile(String),

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Nothing to upload")]
    NothingToUpload,

    /// Stored or submitted record whose fields disagree with its type
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Invalid blob path: {0}")]
    InvalidBlobPath(String),

    #[error("Blob not found: {0}")]
    BlobNotFound(String),

    #[error("Blob store error: {0}")]
    Blob(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UploadResult<T> = Result<T, UploadError>;

impl From<mongodb::error::Error> for UploadError {
    fn from(err: mongodb::error::Error) -> Self {
        UploadError::Database(err.to_string())
    }
}

impl From<std::io::Error> for UploadError {
    fn from(err: std::io::Error) -> Self {
        UploadError::Blob(err.to_string())
    }
}

impl From<EventError> for UploadError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => UploadError::EventNotFound(id),
            EventError::Database(msg) => UploadError::Database(msg),
            other => UploadError::Internal(other.to_string()),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::EventNotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            UploadError::TaskNotFound(_) | UploadError::BlobNotFound(_) => {
                AppError::NotFound(err.to_string())
            }
            UploadError::TaskBusy(_) => AppError::Conflict(err.to_string()),
            UploadError::UnsupportedContentType(_) => AppError::UnprocessableEntity(err.to_string()),
            UploadError::EmptyFile(_)
            | UploadError::EmptyMessage
            | UploadError::NothingToUpload
            | UploadError::InvalidBlobPath(_) => AppError::BadRequest(err.to_string()),
            UploadError::Multipart(e) => AppError::Multipart(e),
            UploadError::Blob(msg) => AppError::BlobStore(msg),
            UploadError::Database(msg) => AppError::DocumentStore(msg),
            UploadError::InvalidRecord(msg) | UploadError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
