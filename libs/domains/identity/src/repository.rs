use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::models::{FederatedIdentity, User};

/// Account persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `DuplicateEmail` when the email is taken (case-insensitive)
    async fn create(&self, user: User) -> IdentityResult<User>;

    async fn get_by_id(&self, id: Uuid) -> IdentityResult<Option<User>>;

    /// Case-insensitive lookup
    async fn get_by_email(&self, email: &str) -> IdentityResult<Option<User>>;

    async fn get_by_identity(&self, provider: &str, subject: &str)
    -> IdentityResult<Option<User>>;

    /// Attach an external identity to an existing account
    async fn link_identity(&self, id: Uuid, identity: FederatedIdentity) -> IdentityResult<User>;
}

/// In-memory implementation of UserRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> IdentityResult<User> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(IdentityError::DuplicateEmail(user.email));
        }

        users.insert(user.id, user.clone());
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> IdentityResult<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> IdentityResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_by_identity(
        &self,
        provider: &str,
        subject: &str,
    ) -> IdentityResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| {
                u.federated
                    .iter()
                    .any(|f| f.provider == provider && f.subject == subject)
            })
            .cloned())
    }

    async fn link_identity(&self, id: Uuid, identity: FederatedIdentity) -> IdentityResult<User> {
        let mut users = self.users.write().await;
        let user = users.get_mut(&id).ok_or(IdentityError::NotFound(id))?;

        if !user.federated.contains(&identity) {
            user.federated.push(identity);
        }
        Ok(user.clone())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use mockall::mock;

    mock! {
        pub UserRepository {}

        #[async_trait]
        impl UserRepository for UserRepository {
            async fn create(&self, user: User) -> IdentityResult<User>;
            async fn get_by_id(&self, id: Uuid) -> IdentityResult<Option<User>>;
            async fn get_by_email(&self, email: &str) -> IdentityResult<Option<User>>;
            async fn get_by_identity(&self, provider: &str, subject: &str) -> IdentityResult<Option<User>>;
            async fn link_identity(&self, id: Uuid, identity: FederatedIdentity) -> IdentityResult<User>;
        }
    }
}
