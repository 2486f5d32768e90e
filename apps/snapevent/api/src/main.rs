use axum_helpers::JwtAuth;
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_uploads::{BlobStore, BlobUrls, FsBlobStore, InMemoryBlobStore};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    let db = match &config.mongodb {
        Some(mongo) => {
            info!("Connecting to MongoDB at {}", mongo.url);
            let db = database::mongodb::connect_with_retry(mongo, None).await?;
            info!("Successfully connected to MongoDB database: {}", db.name());

            api::storage::init_indexes(&db).await?;
            Some(db)
        }
        None => {
            warn!("STORAGE_BACKEND=memory: events, uploads and accounts are lost on restart");
            None
        }
    };

    let urls = BlobUrls::new(&config.api_base_url);
    let blobs: Arc<dyn BlobStore> = match &config.blob_dir {
        Some(dir) => {
            info!("Storing blobs under {}", dir.display());
            Arc::new(FsBlobStore::new(dir, urls))
        }
        None => Arc::new(InMemoryBlobStore::new(urls)),
    };

    let state = AppState {
        auth: JwtAuth::new(&config.jwt),
        config,
        db,
        blobs,
    };

    let api_routes = api::routes(&state);

    // Create a router with OpenAPI docs
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;

    let app = router.merge(health_router(state.config.app.clone()));

    info!(
        "Starting SnapEvent API ({} storage) with graceful shutdown (30s timeout)",
        state.config.storage
    );

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            if let Some(db) = state.db {
                info!("Shutting down: closing MongoDB connections");
                drop(db);
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("SnapEvent API shutdown complete");
    Ok(())
}
