use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use axum_helpers::auth::TokenError;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("An account with email '{0}' already exists")]
    DuplicateEmail(String),

    /// Single form-level message; never says which half was wrong.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("Validation failed: {0}")]
    InvalidForm(#[from] validator::ValidationErrors),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type IdentityResult<T> = Result<T, IdentityError>;

impl From<mongodb::error::Error> for IdentityError {
    fn from(err: mongodb::error::Error) -> Self {
        IdentityError::Database(err.to_string())
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        match err {
            IdentityError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            IdentityError::DuplicateEmail(_) => AppError::Conflict(err.to_string()),
            IdentityError::InvalidCredentials | IdentityError::Unauthorized => {
                AppError::Unauthorized(err.to_string())
            }
            IdentityError::Validation(msg) => AppError::BadRequest(msg),
            IdentityError::InvalidForm(errors) => AppError::ValidationError(errors),
            IdentityError::Token(e) => {
                tracing::debug!("Rejected session token: {}", e);
                AppError::Unauthorized("Invalid or expired session".to_string())
            }
            IdentityError::Database(msg) => AppError::DocumentStore(msg),
            IdentityError::PasswordHash(msg) | IdentityError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}
