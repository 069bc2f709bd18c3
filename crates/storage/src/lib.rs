#![forbid(unsafe_code)]

pub mod credentials;
pub mod repository;
pub mod sqlite;

pub use credentials::{ACTIVE_USER_KEY, CredentialStore, USERS_KEY};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError, UserRepository};
