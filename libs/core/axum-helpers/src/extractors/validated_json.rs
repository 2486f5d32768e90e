//! JSON extractor with automatic validation using the validator crate.

use crate::errors::AppError;
use axum::{
    extract::{FromRequest, Json, Request},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// JSON extractor with automatic validation.
///
/// Body parse failures and validation failures both come back as an
/// [`ErrorResponse`](crate::ErrorResponse); validation failures carry
/// per-field details.
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct PostMessage {
///     #[validate(length(min = 1, message = "Message is required"))]
///     text: String,
/// }
///
/// async fn post_message(ValidatedJson(payload): ValidatedJson<PostMessage>) -> String {
///     payload.text
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::from(e).into_response())?;

        data.validate()
            .map_err(|e| AppError::from(e).into_response())?;

        Ok(ValidatedJson(data))
    }
}
