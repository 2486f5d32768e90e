//! Error types for the events domain

use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("Validation failed: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),

    /// Creating or listing events requires a signed-in owner
    #[error("You must be signed in to manage events")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(String),

    /// Stored document could not be mapped back to an event
    #[error("Corrupt event document: {0}")]
    CorruptDocument(String),

    #[error("QR code error: {0}")]
    Qr(String),
}

pub type EventResult<T> = Result<T, EventError>;

impl From<mongodb::error::Error> for EventError {
    fn from(err: mongodb::error::Error) -> Self {
        EventError::Database(err.to_string())
    }
}

impl From<qrcode::types::QrError> for EventError {
    fn from(err: qrcode::types::QrError) -> Self {
        EventError::Qr(err.to_string())
    }
}

impl From<EventError> for AppError {
    fn from(err: EventError) -> Self {
        match err {
            EventError::NotFound(id) => AppError::NotFound(format!("Event {} not found", id)),
            EventError::InvalidForm(errors) => AppError::ValidationError(errors),
            EventError::Unauthorized => AppError::Unauthorized(err.to_string()),
            EventError::Database(msg) => AppError::DocumentStore(msg),
            EventError::CorruptDocument(msg) | EventError::Qr(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for EventError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
