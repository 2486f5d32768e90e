//! Sign-in flows bound to a [`SessionContext`]

use tracing::instrument;

use crate::context::SessionContext;
use crate::error::{IdentityError, IdentityResult};
use crate::models::{FederatedSignIn, LoginRequest, RegisterRequest, Session};
use crate::repository::UserRepository;
use crate::service::IdentityService;

/// Front door for pages that sign users in and out. Every successful
/// sign-in publishes the session to the context; sign-out clears it.
pub struct AuthClient<R: UserRepository> {
    service: IdentityService<R>,
    context: SessionContext,
}

impl<R: UserRepository> AuthClient<R> {
    pub fn new(service: IdentityService<R>, context: SessionContext) -> Self {
        Self { service, context }
    }

    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    pub fn service(&self) -> &IdentityService<R> {
        &self.service
    }

    pub async fn register(&self, input: RegisterRequest) -> IdentityResult<Session> {
        let session = self.service.register(input).await?;
        self.context.set(session.clone());
        Ok(session)
    }

    pub async fn sign_in(&self, input: LoginRequest) -> IdentityResult<Session> {
        let session = self.service.sign_in(input).await?;
        self.context.set(session.clone());
        Ok(session)
    }

    pub async fn sign_in_federated(&self, input: FederatedSignIn) -> IdentityResult<Session> {
        let session = self.service.sign_in_federated(input).await?;
        self.context.set(session.clone());
        Ok(session)
    }

    /// Revokes the current token and clears the context. The context is
    /// cleared even when revocation fails.
    #[instrument(skip(self))]
    pub async fn sign_out(&self) -> IdentityResult<()> {
        let token = self.context.token().ok_or(IdentityError::Unauthorized)?;
        let revoked = self.service.sign_out(&token).await;
        self.context.clear();
        revoked
    }
}
