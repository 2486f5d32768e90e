//! HTTP handlers for the events domain

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    middleware,
    response::IntoResponse,
    routing::get,
};
use axum_helpers::{JwtAuth, UuidPath, jwt_auth_middleware};
use domain_identity::CurrentUser;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

use crate::error::EventResult;
use crate::filter::EventFilter;
use crate::links::{QrQuery, qr_file_name};
use crate::models::{CreateEventForm, EventListQuery, EventView};
use crate::repository::EventRepository;
use crate::service::EventService;

/// Mounted at `/events`. Creating and listing need a session; the
/// per-event routes are public so guests can follow a QR code.
pub fn router<R: EventRepository + 'static>(service: Arc<EventService<R>>, auth: JwtAuth) -> Router {
    let owner_routes = Router::new()
        .route("/", get(list_events::<R>).post(create_event::<R>))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    let public_routes = Router::new()
        .route("/{id}", get(get_event::<R>))
        .route("/{id}/qr", get(event_qr::<R>));

    owner_routes.merge(public_routes).with_state(service)
}

/// Create an event owned by the caller
#[utoipa::path(
    post,
    path = "/",
    request_body = CreateEventForm,
    responses(
        (status = 201, description = "Event created", body = EventView),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
#[instrument(skip(service, owner, form), fields(owner = %owner.uid))]
pub async fn create_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    owner: CurrentUser,
    Json(form): Json<CreateEventForm>,
) -> EventResult<impl IntoResponse> {
    let view = service.create(&owner, form).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Caller's events, newest first
#[utoipa::path(
    get,
    path = "/",
    params(EventListQuery),
    responses(
        (status = 200, description = "Owner's events", body = Vec<EventView>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer" = [])),
    tag = "events"
)]
#[instrument(skip(service, owner, query))]
pub async fn list_events<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    owner: CurrentUser,
    Query(query): Query<EventListQuery>,
) -> EventResult<Json<Vec<EventView>>> {
    let filter = EventFilter::from(query);
    Ok(Json(service.list_for_owner(owner.uid, &filter).await?))
}

/// Event details and share links
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event found", body = EventView),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn get_event<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
) -> EventResult<Json<EventView>> {
    Ok(Json(service.get(id).await?))
}

/// QR code for the upload (default) or gallery page
#[utoipa::path(
    get,
    path = "/{id}/qr",
    params(("id" = Uuid, Path, description = "Event ID"), QrQuery),
    responses(
        (status = 200, description = "SVG image", content_type = "image/svg+xml", body = String),
        (status = 404, description = "Event not found")
    ),
    tag = "events"
)]
pub async fn event_qr<R: EventRepository>(
    State(service): State<Arc<EventService<R>>>,
    UuidPath(id): UuidPath,
    Query(query): Query<QrQuery>,
) -> EventResult<impl IntoResponse> {
    let svg = service.qr_svg(id, query.target).await?;
    let disposition = format!("inline; filename=\"{}\"", qr_file_name(id));

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        svg,
    ))
}
