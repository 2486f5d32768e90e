use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::UuidPath;
use domain_events::EventRepository;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{UploadError, UploadResult};
use crate::models::{
    EventRecord, FailedUpload, FlatRecord, LocalFile, PostMessage, UploadOutcome,
    is_image_content_type,
};
use crate::repository::RecordRepository;
use crate::service::{UploadBackend, UploadService};
use crate::session::UploadSession;

/// Request body cap for photo uploads
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Mounted at `/events`; all routes are public so guests can upload
/// without an account.
pub fn router<E, R>(service: Arc<UploadService<E, R>>) -> Router
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    Router::new()
        .route("/{id}/photos", post(upload_photos::<E, R>))
        .route("/{id}/messages", post(post_message::<E, R>))
        .route("/{id}/records", get(list_records::<E, R>))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(service)
}

/// Mounted at `/blobs`
pub fn blobs_router<E, R>(service: Arc<UploadService<E, R>>) -> Router
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    Router::new()
        .route("/{*path}", get(get_blob::<E, R>))
        .with_state(service)
}

/// Upload photos, optionally captioned
///
/// Multipart fields: any number of `file` parts (images only) and an
/// optional `message` attached to every photo. With no files, a
/// non-empty `message` is posted on its own.
#[utoipa::path(
    post,
    path = "/{id}/photos",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    request_body(content_type = "multipart/form-data", description = "`file` parts and optional `message`"),
    responses(
        (status = 201, description = "At least one record stored", body = UploadOutcome),
        (status = 400, description = "Nothing to upload"),
        (status = 404, description = "Event not found"),
        (status = 422, description = "Non-image file"),
        (status = 502, description = "Every upload failed", body = UploadOutcome)
    ),
    tag = "uploads"
)]
#[instrument(skip(service, multipart))]
pub async fn upload_photos<E, R>(
    State(service): State<Arc<UploadService<E, R>>>,
    UuidPath(event_id): UuidPath,
    mut multipart: Multipart,
) -> UploadResult<impl IntoResponse>
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    service.ensure_event(event_id).await?;

    let mut files = Vec::new();
    let mut message = String::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" | "files" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                if !is_image_content_type(&content_type) {
                    return Err(UploadError::UnsupportedContentType(content_type));
                }
                let bytes = field.bytes().await?;
                files.push(LocalFile::new(file_name, content_type, bytes));
            }
            "message" => message = field.text().await?,
            other => tracing::debug!(field = other, "Ignoring multipart field"),
        }
    }

    let backend: Arc<dyn UploadBackend> = service;
    let mut session = UploadSession::new(event_id, backend);

    if files.is_empty() {
        let record = session
            .post_message(&message)
            .await?
            .ok_or(UploadError::NothingToUpload)?;
        let outcome = UploadOutcome {
            records: vec![record],
            failed: Vec::new(),
        };
        return Ok((StatusCode::CREATED, Json(outcome)));
    }

    session.submit_files(files);
    session.set_message(message);
    session.upload_all().await;

    let mut records = Vec::new();
    let mut failed = Vec::new();
    for task in session.tasks() {
        match (task.record(), task.error()) {
            (Some(record), _) => records.push(record.clone()),
            (None, error) => failed.push(FailedUpload {
                file_name: task.file().file_name.clone(),
                error: error.unwrap_or("upload did not finish").to_string(),
            }),
        }
    }

    let status = if records.is_empty() {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(UploadOutcome { records, failed })))
}

/// Post a text-only message
#[utoipa::path(
    post,
    path = "/{id}/messages",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    request_body = PostMessage,
    responses(
        (status = 201, description = "Message stored", body = FlatRecord),
        (status = 400, description = "Empty message"),
        (status = 404, description = "Event not found")
    ),
    tag = "uploads"
)]
#[instrument(skip(service, input))]
pub async fn post_message<E, R>(
    State(service): State<Arc<UploadService<E, R>>>,
    UuidPath(event_id): UuidPath,
    Json(input): Json<PostMessage>,
) -> UploadResult<impl IntoResponse>
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    let record = service.post_message(event_id, input.text).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Records of an event, newest first
#[utoipa::path(
    get,
    path = "/{id}/records",
    params(("id" = uuid::Uuid, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Records", body = Vec<FlatRecord>),
        (status = 404, description = "Event not found")
    ),
    tag = "uploads"
)]
pub async fn list_records<E, R>(
    State(service): State<Arc<UploadService<E, R>>>,
    UuidPath(event_id): UuidPath,
) -> UploadResult<Json<Vec<EventRecord>>>
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    Ok(Json(service.list_records(event_id).await?))
}

/// Stored image bytes
#[utoipa::path(
    get,
    path = "/{path}",
    params(("path" = String, Path, description = "Blob path, `<eventId>/<millis>-<recordId>-<fileName>`")),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 400, description = "Invalid path"),
        (status = 404, description = "Blob not found")
    ),
    tag = "uploads"
)]
pub async fn get_blob<E, R>(
    State(service): State<Arc<UploadService<E, R>>>,
    Path(path): Path<String>,
) -> UploadResult<impl IntoResponse>
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
{
    let blob = service.get_blob(&path).await?;

    Ok((
        [
            (header::CONTENT_TYPE, blob.content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        blob.bytes,
    ))
}
