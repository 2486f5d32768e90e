use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, JwtClaims};
use uuid::Uuid;

use crate::models::CurrentUser;

/// Signed-in user taken from claims placed by
/// [`jwt_auth_middleware`](axum_helpers::jwt_auth_middleware).
///
/// Routes using this extractor must sit behind that middleware.
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let claims = parts
            .extensions
            .get::<JwtClaims>()
            .ok_or_else(|| AppError::Unauthorized("Not signed in".to_string()).into_response())?;

        let uid = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::Unauthorized("Invalid token subject".to_string()).into_response())?;

        Ok(CurrentUser {
            uid,
            display_name: claims.name.clone(),
            email: claims.email.clone(),
        })
    }
}
