use axum::{Json, Router, extract::State, routing::get};
use axum_helpers::UuidPath;
use domain_events::EventRepository;
use domain_uploads::RecordRepository;
use std::sync::Arc;
use tracing::instrument;

use crate::error::GalleryResult;
use crate::model::GalleryResponse;
use crate::service::GalleryService;

/// Mounted at `/events`, public
pub fn router<E, R>(service: Arc<GalleryService<E, R>>) -> Router
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    Router::new()
        .route("/{id}/gallery", get(get_gallery::<E, R>))
        .with_state(service)
}

/// Event gallery: images, text-only messages and image groups
#[utoipa::path(
    get,
    path = "/{id}/gallery",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Gallery", body = GalleryResponse),
        (status = 400, description = "Invalid UUID"),
        (status = 404, description = "Event not found")
    ),
    tag = "gallery"
)]
#[instrument(skip(service))]
pub async fn get_gallery<E, R>(
    State(service): State<Arc<GalleryService<E, R>>>,
    UuidPath(event_id): UuidPath,
) -> GalleryResult<Json<GalleryResponse>>
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    let gallery = service.load(event_id).await?;
    Ok(Json(gallery.into()))
}
