use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{ValidatedJson, auth::extract_token_from_request};
use std::sync::Arc;

use crate::error::{IdentityError, IdentityResult};
use crate::models::{CurrentUser, LoginRequest, RegisterRequest, Session};
use crate::repository::UserRepository;
use crate::service::IdentityService;

/// Mounted at `/auth`.
pub fn router<R: UserRepository + 'static>(service: IdentityService<R>) -> Router {
    Router::new()
        .route("/register", post(register::<R>))
        .route("/login", post(login::<R>))
        .route("/logout", post(logout::<R>))
        .route("/me", get(me::<R>))
        .with_state(Arc::new(service))
}

fn bearer(headers: &HeaderMap) -> IdentityResult<String> {
    extract_token_from_request(headers).ok_or(IdentityError::Unauthorized)
}

/// Create an account
#[utoipa::path(
    post,
    path = "/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = Session),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register<R: UserRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> IdentityResult<impl IntoResponse> {
    let session = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(session)))
}

/// Password sign-in
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed in", body = Session),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn login<R: UserRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> IdentityResult<Json<Session>> {
    Ok(Json(service.sign_in(input).await?))
}

/// Revoke the current session
#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn logout<R: UserRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    headers: HeaderMap,
) -> IdentityResult<StatusCode> {
    service.sign_out(&bearer(&headers)?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Current user
#[utoipa::path(
    get,
    path = "/me",
    responses(
        (status = 200, description = "Signed-in user", body = CurrentUser),
        (status = 401, description = "Missing, invalid or revoked token")
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me<R: UserRepository>(
    State(service): State<Arc<IdentityService<R>>>,
    headers: HeaderMap,
) -> IdentityResult<Json<CurrentUser>> {
    Ok(Json(service.current_user(&bearer(&headers)?).await?))
}
