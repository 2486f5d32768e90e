use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Link between an account and an external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FederatedIdentity {
    /// e.g. "google"
    pub provider: String,
    /// Provider-scoped user id
    pub subject: String,
}

/// Account entity
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    /// Argon2 hash; absent for federated-only accounts, never exposed
    #[serde(skip_serializing, default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub federated: Vec<FederatedIdentity>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: email.into(),
            display_name: display_name.into(),
            password_hash: None,
            federated: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_password_hash(mut self, hash: String) -> Self {
        self.password_hash = Some(hash);
        self
    }

    pub fn with_identity(mut self, identity: FederatedIdentity) -> Self {
        self.federated.push(identity);
        self
    }
}

/// What the rest of the app knows about the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub uid: Uuid,
    pub display_name: String,
    pub email: String,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            uid: user.id,
            display_name: user.display_name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Signed session handed to the client after sign-in or sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: CurrentUser,
    pub expires_at: DateTime<Utc>,
}

/// Sign-up form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Passwords do not match"))]
    pub confirm_password: String,
}

/// Password sign-in form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Identity asserted by an external provider after it verified the user.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FederatedSignIn {
    pub provider: String,
    pub subject: String,
    pub email: String,
    pub display_name: Option<String>,
}
