use super::config::JwtConfig;
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub type TokenError = jsonwebtoken::errors::Error;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,  // Subject (user ID)
    pub email: String,
    pub name: String, // Display name
    pub exp: i64,     // Expiration time
    pub iat: i64,     // Issued at
    pub jti: String,  // JWT ID (for revocation)
}

/// A freshly signed token together with its claims.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: JwtClaims,
}

/// Stateless HS256 tokens plus an in-process revocation list.
///
/// Revoked `jti`s are kept until the token's own expiry; after that the
/// signature check rejects the token anyway.
#[derive(Clone)]
pub struct JwtAuth {
    secret: Arc<str>,
    ttl_secs: i64,
    revoked: Arc<RwLock<HashMap<String, i64>>>,
}

impl JwtAuth {
    pub fn new(config: &JwtConfig) -> Self {
        tracing::info!(ttl_secs = config.ttl_secs, "JWT auth initialized");
        Self {
            secret: Arc::from(config.secret.as_str()),
            ttl_secs: config.ttl_secs,
            revoked: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Sign a session token for the given user.
    pub fn create_token(
        &self,
        user_id: &str,
        email: &str,
        name: &str,
    ) -> Result<IssuedToken, TokenError> {
        let now = Utc::now();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(IssuedToken { token, claims })
    }

    /// Verify signature and expiry, then decode claims.
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, TokenError> {
        let token_data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;

        Ok(token_data.claims)
    }

    /// Reject the token with this `jti` from now on.
    pub async fn revoke(&self, jti: &str, exp: i64) {
        let now = Utc::now().timestamp();
        let mut revoked = self.revoked.write().await;
        revoked.retain(|_, expires_at| *expires_at > now);
        revoked.insert(jti.to_string(), exp);
        tracing::debug!(jti, "Token revoked");
    }

    pub async fn is_revoked(&self, jti: &str) -> bool {
        self.revoked.read().await.contains_key(jti)
    }
}
