use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use trivia_core::model::User;

use crate::credentials::CredentialStore;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value contract, the same shape as browser local storage.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Repository contract for registered users and the active session.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user with exactly this email and password.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the user collection cannot be loaded.
    async fn find_user(&self, email: &str, password: &str) -> Result<Option<User>, StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the user collection cannot be loaded.
    async fn email_exists(&self, email: &str) -> Result<bool, StorageError>;

    /// Append a new user to the collection.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the email is already registered.
    async fn save_user(&self, user: &User) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the user collection cannot be loaded.
    async fn list_users(&self) -> Result<Vec<User>, StorageError>;

    /// The persisted active session, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend failures; unreadable session
    /// data is reported as no session.
    async fn active_user(&self) -> Result<Option<User>, StorageError>;

    /// Persist (`Some`) or clear (`None`) the active session.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the session cannot be written.
    async fn set_active_user(&self, user: Option<&User>) -> Result<(), StorageError>;
}

/// Simple in-memory store for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Aggregates the raw store and the user repository behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
    pub users: Arc<dyn UserRepository>,
}

impl Storage {
    /// Wrap any key-value backend with the credential store.
    #[must_use]
    pub fn from_store(kv: Arc<dyn KeyValueStore>) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(CredentialStore::new(Arc::clone(&kv)));
        Self { kv, users }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryStore::new()))
    }
}
