//! Credential store: the registered-user collection and the active session,
//! each kept as JSON text under a fixed key.

use std::sync::Arc;

use async_trait::async_trait;
use trivia_core::model::User;

use crate::repository::{KeyValueStore, StorageError, UserRepository};

/// Key holding the JSON array of every registered user.
pub const USERS_KEY: &str = "users";

/// Key holding the JSON record of the signed-in user.
pub const ACTIVE_USER_KEY: &str = "currentUser";

/// `UserRepository` over any `KeyValueStore`.
///
/// The whole collection is read and rewritten on every change.
#[derive(Clone)]
pub struct CredentialStore {
    kv: Arc<dyn KeyValueStore>,
}

impl CredentialStore {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    async fn load_users(&self) -> Result<Vec<User>, StorageError> {
        let Some(raw) = self.kv.get(USERS_KEY).await? else {
            return Ok(Vec::new());
        };
        serde_json::from_str(&raw).map_err(|err| StorageError::Serialization(err.to_string()))
    }

    async fn store_users(&self, users: &[User]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(users)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.kv.set(USERS_KEY, &raw).await
    }
}

#[async_trait]
impl UserRepository for CredentialStore {
    async fn find_user(&self, email: &str, password: &str) -> Result<Option<User>, StorageError> {
        let users = self.load_users().await?;
        Ok(users.into_iter().find(|user| user.matches(email, password)))
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StorageError> {
        let users = self.load_users().await?;
        Ok(users.iter().any(|user| user.email == email))
    }

    async fn save_user(&self, user: &User) -> Result<(), StorageError> {
        let mut users = self.load_users().await?;
        if users.iter().any(|existing| existing.email == user.email) {
            return Err(StorageError::Conflict);
        }
        users.push(user.clone());
        self.store_users(&users).await
    }

    async fn list_users(&self) -> Result<Vec<User>, StorageError> {
        self.load_users().await
    }

    async fn active_user(&self) -> Result<Option<User>, StorageError> {
        let Some(raw) = self.kv.get(ACTIVE_USER_KEY).await? else {
            return Ok(None);
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Ok(Some(user)),
            Err(err) => {
                log::warn!("ignoring unreadable active session: {err}");
                Ok(None)
            }
        }
    }

    async fn set_active_user(&self, user: Option<&User>) -> Result<(), StorageError> {
        match user {
            Some(user) => {
                let raw = serde_json::to_string(user)
                    .map_err(|err| StorageError::Serialization(err.to_string()))?;
                self.kv.set(ACTIVE_USER_KEY, &raw).await
            }
            None => self.kv.remove(ACTIVE_USER_KEY).await,
        }
    }
}
