//! MongoDB implementation of UserRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{self, doc};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{IdentityError, IdentityResult};
use crate::models::{FederatedIdentity, User};
use crate::repository::UserRepository;

const DUPLICATE_KEY: i32 = 11000;

/// Stored account. Unlike [`User`], the password hash is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    /// Lowercased email backing the unique index
    pub email_lower: String,
    pub display_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub federated: Vec<FederatedIdentity>,
    pub created_at: bson::DateTime,
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.clone(),
            email_lower: user.email.to_lowercase(),
            display_name: user.display_name.clone(),
            password_hash: user.password_hash.clone(),
            federated: user.federated.clone(),
            created_at: bson::DateTime::from_millis(user.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<UserDocument> for User {
    type Error = IdentityError;

    fn try_from(doc: UserDocument) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&doc.id)
            .map_err(|e| IdentityError::Internal(format!("user '{}': {}", doc.id, e)))?;
        let created_at = DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
            .ok_or_else(|| IdentityError::Internal(format!("user {}: bad createdAt", doc.id)))?;

        Ok(User {
            id,
            email: doc.email,
            display_name: doc.display_name,
            password_hash: doc.password_hash,
            federated: doc.federated,
            created_at,
        })
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// MongoDB-based user repository
#[derive(Clone)]
pub struct MongoUserRepository {
    collection: Collection<UserDocument>,
}

impl MongoUserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("users"),
        }
    }

    pub async fn create_indexes(&self) -> IdentityResult<()> {
        let indexes = vec![
            IndexModel::builder()
                .keys(doc! { "emailLower": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
            IndexModel::builder()
                .keys(doc! { "federated.provider": 1, "federated.subject": 1 })
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        Ok(())
    }

    async fn find_one(&self, filter: bson::Document) -> IdentityResult<Option<User>> {
        self.collection
            .find_one(filter)
            .await?
            .map(User::try_from)
            .transpose()
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn create(&self, user: User) -> IdentityResult<User> {
        match self.collection.insert_one(UserDocument::from(&user)).await {
            Ok(_) => Ok(user),
            Err(e) if is_duplicate_key(&e) => Err(IdentityError::DuplicateEmail(user.email)),
            Err(e) => Err(e.into()),
        }
    }

    async fn get_by_id(&self, id: Uuid) -> IdentityResult<Option<User>> {
        self.find_one(doc! { "_id": id.to_string() }).await
    }

    async fn get_by_email(&self, email: &str) -> IdentityResult<Option<User>> {
        self.find_one(doc! { "emailLower": email.to_lowercase() })
            .await
    }

    async fn get_by_identity(
        &self,
        provider: &str,
        subject: &str,
    ) -> IdentityResult<Option<User>> {
        self.find_one(doc! {
            "federated": { "$elemMatch": { "provider": provider, "subject": subject } }
        })
        .await
    }

    #[instrument(skip(self, identity), fields(provider = %identity.provider))]
    async fn link_identity(&self, id: Uuid, identity: FederatedIdentity) -> IdentityResult<User> {
        let result = self
            .collection
            .update_one(
                doc! { "_id": id.to_string() },
                doc! { "$addToSet": { "federated": {
                    "provider": identity.provider.clone(),
                    "subject": identity.subject.clone(),
                } } },
            )
            .await?;

        if result.matched_count == 0 {
            return Err(IdentityError::NotFound(id));
        }
        self.get_by_id(id).await?.ok_or(IdentityError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_keeps_password_hash_and_lowercases_email() {
        let user = User::new("Ana@Example.com", "Ana")
            .with_password_hash("$argon2id$hash".into())
            .with_identity(FederatedIdentity {
                provider: "google".into(),
                subject: "g-1".into(),
            });

        let document = bson::to_document(&UserDocument::from(&user)).unwrap();
        assert_eq!(document.get_str("emailLower").unwrap(), "ana@example.com");
        assert_eq!(document.get_str("passwordHash").unwrap(), "$argon2id$hash");
        assert!(document.get_datetime("createdAt").is_ok());

        let restored = User::try_from(UserDocument::from(&user)).unwrap();
        assert_eq!(restored.id, user.id);
        assert_eq!(restored.email, "Ana@Example.com");
        assert_eq!(restored.password_hash, user.password_hash);
        assert_eq!(restored.federated, user.federated);
    }

    #[test]
    fn test_federated_only_document_omits_hash() {
        let user = User::new("bob@example.com", "Bob");
        let document = bson::to_document(&UserDocument::from(&user)).unwrap();
        assert!(document.get("passwordHash").is_none());
    }
}
