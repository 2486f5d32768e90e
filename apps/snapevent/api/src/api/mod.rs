//! API routes module
//!
//! Wires the domain routers to the configured storage backend. Every
//! service shares one event repository, so an event created by its owner
//! is immediately visible to the upload and gallery routes.

pub mod health;
pub mod storage;

use axum::Router;
use domain_events::{
    EventRepository, EventService, InMemoryEventRepository, LinkBuilder, MongoEventRepository,
};
use domain_gallery::GalleryService;
use domain_identity::{IdentityService, InMemoryUserRepository, MongoUserRepository, UserRepository};
use domain_uploads::{
    InMemoryRecordRepository, MongoRecordRepository, RecordRepository, UploadService,
};
use std::sync::Arc;
use tracing::info;

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    let api = match &state.db {
        Some(db) => {
            info!("Using MongoDB repositories");
            compose(
                state,
                Arc::new(MongoEventRepository::new(db)),
                Arc::new(MongoRecordRepository::new(db)),
                MongoUserRepository::new(db),
            )
        }
        None => {
            info!("Using in-memory repositories");
            compose(
                state,
                Arc::new(InMemoryEventRepository::new()),
                Arc::new(InMemoryRecordRepository::new()),
                InMemoryUserRepository::new(),
            )
        }
    };

    api.merge(health::router(state.clone()))
}

fn compose<E, R, U>(state: &AppState, events: Arc<E>, records: Arc<R>, users: U) -> Router
where
    E: EventRepository + 'static,
    R: RecordRepository + 'static,
    U: UserRepository + 'static,
{
    let links = LinkBuilder::new(&state.config.public_base_url);
    let event_service = Arc::new(EventService::new(events.clone(), links));
    let upload_service = Arc::new(UploadService::new(events, records.clone(), state.blobs.clone()));
    let gallery_service = Arc::new(GalleryService::new(event_service.clone(), records));
    let identity_service = IdentityService::new(users, state.auth.clone());

    let event_routes = domain_events::handlers::router(event_service, state.auth.clone())
        .merge(domain_uploads::handlers::router(upload_service.clone()))
        .merge(domain_gallery::handlers::router(gallery_service));

    Router::new()
        .nest("/auth", domain_identity::handlers::router(identity_service))
        .nest("/events", event_routes)
        .nest("/blobs", domain_uploads::handlers::blobs_router(upload_service))
}
