use super::jwt::JwtAuth;
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Extract a JWT from `Authorization: Bearer` or the `access_token` cookie.
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|s| s.trim().to_string()))
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == "access_token").then(|| value.to_string())
                    })
                })
        })
        .filter(|token| !token.is_empty())
}

/// JWT authentication middleware.
///
/// Rejects missing, invalid, expired or revoked tokens with 401 and
/// inserts [`JwtClaims`](super::JwtClaims) into request extensions on
/// success.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = extract_token_from_request(request.headers()) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return AppError::Unauthorized("No token provided".to_string()).into_response();
    };

    let claims = match auth.verify_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!("JWT verification failed: {}", e);
            return AppError::Unauthorized("Invalid token".to_string()).into_response();
        }
    };

    if auth.is_revoked(&claims.jti).await {
        tracing::debug!(jti = %claims.jti, "Token is revoked");
        return AppError::Unauthorized("Token has been revoked".to_string()).into_response();
    }

    request.extensions_mut().insert(claims);
    next.run(request).await
}
