//! Readiness endpoint

use axum::{
    Router,
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_helpers::server::{HealthCheckFuture, run_health_checks};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/ready", get(ready_handler))
        .with_state(state)
}

/// Pings MongoDB when it backs storage; the in-memory backend is always ready.
pub async fn ready_handler(State(state): State<AppState>) -> Response {
    let mut checks: Vec<(&str, HealthCheckFuture<'_>)> = Vec::new();

    match &state.db {
        Some(db) => checks.push((
            "mongodb",
            Box::pin(async move {
                database::mongodb::check_health(db)
                    .await
                    .map(|_| ())
                    .map_err(|e| format!("MongoDB ping failed: {}", e))
            }),
        )),
        None => checks.push(("storage", Box::pin(async { Ok(()) }))),
    }

    match run_health_checks(checks).await {
        Ok((status, json)) => (status, json).into_response(),
        Err((status, json)) => (status, json).into_response(),
    }
}
