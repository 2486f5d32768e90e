//! Identity domain
//!
//! Password and federated sign-in, HS256 session tokens with revocation,
//! and the [`SessionContext`] observable that components read the
//! signed-in user from. [`AuthClient`] keeps that context in step with
//! sign-in and sign-out.
//!
//! ```rust,ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig};
//! use domain_identity::{IdentityService, InMemoryUserRepository, handlers};
//!
//! let service = IdentityService::new(InMemoryUserRepository::new(), JwtAuth::new(&config));
//! let router = handlers::router(service);
//! ```

pub mod client;
pub mod context;
pub mod error;
mod extractors;
pub mod handlers;
pub mod models;
pub mod mongodb;
pub mod repository;
pub mod service;

use utoipa::OpenApi;

pub use client::AuthClient;
pub use context::SessionContext;
pub use error::{IdentityError, IdentityResult};
pub use models::{
    CurrentUser, FederatedIdentity, FederatedSignIn, LoginRequest, RegisterRequest, Session, User,
};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use self::mongodb::{MongoUserRepository, UserDocument};
pub use service::IdentityService;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register,
        handlers::login,
        handlers::logout,
        handlers::me,
    ),
    components(schemas(RegisterRequest, LoginRequest, Session, CurrentUser)),
    tags((name = "auth", description = "Sign-up, sign-in and sessions"))
)]
pub struct ApiDoc;
