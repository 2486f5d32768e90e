//! UUID path parameter extractor.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Extractor for a single UUID path parameter.
///
/// Malformed ids are rejected with `INVALID_UUID` instead of axum's
/// plain-text path rejection.
///
/// ```ignore
/// async fn get_event(UuidPath(id): UuidPath) -> String {
///     format!("Event ID: {}", id)
/// }
///
/// let app = Router::new().route("/events/{id}", get(get_event));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| e.into_response())?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|e| AppError::from(e).into_response())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    async fn handler(UuidPath(id): UuidPath) -> String {
        id.to_string()
    }

    async fn status_for(path: &str) -> StatusCode {
        Router::new()
            .route("/events/{id}", get(handler))
            .oneshot(
                axum::http::Request::get(path)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_valid_uuid() {
        let path = format!("/events/{}", Uuid::new_v4());
        assert_eq!(status_for(&path).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_uuid() {
        assert_eq!(status_for("/events/not-a-uuid").await, StatusCode::BAD_REQUEST);
    }
}
