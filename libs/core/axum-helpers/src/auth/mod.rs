//! Bearer-token authentication.
//!
//! - HS256 JWT creation and verification
//! - In-process revocation list keyed by `jti`, so signed-out tokens are
//!   rejected until they expire
//! - Middleware that puts verified [`JwtClaims`] into request extensions
//!
//! ```ignore
//! use axum_helpers::auth::{JwtAuth, JwtConfig, jwt_auth_middleware};
//! use core_config::FromEnv;
//!
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let protected = Router::new()
//!     .route("/events", post(create_event))
//!     .layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{IssuedToken, JwtAuth, JwtClaims, TokenError};
pub use middleware::{extract_token_from_request, jwt_auth_middleware};
