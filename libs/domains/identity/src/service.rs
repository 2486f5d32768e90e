use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use axum_helpers::auth::{IssuedToken, JwtAuth};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::error::{IdentityError, IdentityResult};
use crate::models::{
    CurrentUser, FederatedIdentity, FederatedSignIn, LoginRequest, RegisterRequest, Session, User,
};
use crate::repository::UserRepository;

/// Accounts and sessions.
#[derive(Clone)]
pub struct IdentityService<R: UserRepository> {
    repository: Arc<R>,
    auth: JwtAuth,
}

impl<R: UserRepository> IdentityService<R> {
    pub fn new(repository: R, auth: JwtAuth) -> Self {
        Self {
            repository: Arc::new(repository),
            auth,
        }
    }

    /// Token verifier shared with the auth middleware.
    pub fn auth(&self) -> &JwtAuth {
        &self.auth
    }

    /// Create a password account and sign it in.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterRequest) -> IdentityResult<Session> {
        input.validate()?;

        let password_hash = hash_password(&input.password)?;
        let user = User::new(input.email.trim(), input.name.trim()).with_password_hash(password_hash);

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id, "User registered");

        self.issue_session(&user)
    }

    /// Password sign-in.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn sign_in(&self, input: LoginRequest) -> IdentityResult<Session> {
        let user = self
            .repository
            .get_by_email(input.email.trim())
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let Some(hash) = user.password_hash.as_deref() else {
            return Err(IdentityError::InvalidCredentials);
        };

        if !verify_password(&input.password, hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        info!(user_id = %user.id, "User signed in");
        self.issue_session(&user)
    }

    /// Sign in with an identity a provider has already verified.
    ///
    /// Matches on `(provider, subject)` first, then links to an account
    /// with the same email, otherwise creates a new account.
    #[instrument(skip(self, input), fields(provider = %input.provider))]
    pub async fn sign_in_federated(&self, input: FederatedSignIn) -> IdentityResult<Session> {
        if input.subject.trim().is_empty() {
            return Err(IdentityError::Validation(
                "Provider subject is required".to_string(),
            ));
        }

        let identity = FederatedIdentity {
            provider: input.provider.clone(),
            subject: input.subject.clone(),
        };

        if let Some(user) = self
            .repository
            .get_by_identity(&input.provider, &input.subject)
            .await?
        {
            return self.issue_session(&user);
        }

        let user = match self.repository.get_by_email(&input.email).await? {
            Some(existing) => {
                info!(user_id = %existing.id, "Linking provider identity to existing account");
                self.repository.link_identity(existing.id, identity).await?
            }
            None => {
                let display_name = input
                    .display_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| default_display_name(&input.email));
                let user = User::new(input.email, display_name).with_identity(identity);
                self.repository.create(user).await?
            }
        };

        self.issue_session(&user)
    }

    /// Revoke the session token; its `jti` stays rejected until expiry.
    #[instrument(skip(self, token))]
    pub async fn sign_out(&self, token: &str) -> IdentityResult<()> {
        let claims = self.auth.verify_token(token)?;
        self.auth.revoke(&claims.jti, claims.exp).await;
        info!(user_id = %claims.sub, "User signed out");
        Ok(())
    }

    /// Resolve a session token to its user.
    #[instrument(skip(self, token))]
    pub async fn current_user(&self, token: &str) -> IdentityResult<CurrentUser> {
        let claims = self.auth.verify_token(token)?;
        if self.auth.is_revoked(&claims.jti).await {
            return Err(IdentityError::Unauthorized);
        }

        let id = Uuid::parse_str(&claims.sub).map_err(|_| IdentityError::Unauthorized)?;
        let user = self
            .repository
            .get_by_id(id)
            .await?
            .ok_or(IdentityError::Unauthorized)?;

        Ok(CurrentUser::from(&user))
    }

    fn issue_session(&self, user: &User) -> IdentityResult<Session> {
        let IssuedToken { token, claims } =
            self.auth
                .create_token(&user.id.to_string(), &user.email, &user.display_name)?;

        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .ok_or_else(|| IdentityError::Internal("Session expiry out of range".to_string()))?;

        Ok(Session {
            token,
            user: CurrentUser::from(user),
            expires_at,
        })
    }
}

fn default_display_name(email: &str) -> String {
    email.split('@').next().unwrap_or(email).to_string()
}

fn hash_password(password: &str) -> IdentityResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| IdentityError::PasswordHash(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> IdentityResult<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| IdentityError::PasswordHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
