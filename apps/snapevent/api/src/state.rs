//! Application state management.
//!
//! Shared by the route builders and the readiness check:
//! - Configuration
//! - MongoDB database handle (absent with the in-memory backend)
//! - Session token issuer/verifier
//! - Blob store for guest photos

use axum_helpers::JwtAuth;
use domain_uploads::BlobStore;
use mongodb::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// `None` when `STORAGE_BACKEND=memory`
    pub db: Option<Database>,
    pub auth: JwtAuth,
    pub blobs: Arc<dyn BlobStore>,
}
