use std::sync::Arc;

use storage::repository::{StorageError, UserRepository};
use tokio::sync::RwLock;
use trivia_core::model::{Registration, User};

use crate::error::AuthError;

/// Session context: who is signed in, backed by the credential store.
///
/// Credentials are compared as plaintext with exact, case-sensitive matching.
/// This is intentionally insecure demo logic, not an authentication scheme.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    current: RwLock<Option<User>>,
}

impl AuthService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self {
            users,
            current: RwLock::new(None),
        }
    }

    /// Load the persisted session once at startup.
    ///
    /// Unreadable session data counts as signed out.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the backend cannot be read.
    pub async fn restore_session(&self) -> Result<Option<User>, AuthError> {
        let user = self.users.active_user().await?;
        if let Some(user) = &user {
            log::info!("restored session for {}", user.email);
        }
        *self.current.write().await = user.clone();
        Ok(user)
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Registration` for invalid form input,
    /// `AuthError::DuplicateEmail` if the email is taken (the collection is left
    /// untouched), or `AuthError::Storage` on persistence failures.
    pub async fn register(&self, registration: Registration) -> Result<User, AuthError> {
        let user = registration.validate()?;
        if self.users.email_exists(&user.email).await? {
            return Err(AuthError::DuplicateEmail);
        }

        self.users.save_user(&user).await.map_err(|err| match err {
            StorageError::Conflict => AuthError::DuplicateEmail,
            other => AuthError::Storage(other),
        })?;
        log::info!("registered {}", user.email);

        self.sign_in(user).await
    }

    /// Sign in with an exact email and password match.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if no user matches, or
    /// `AuthError::Storage` on persistence failures.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.users.find_user(email, password).await? else {
            log::debug!("rejected login for {email}");
            return Err(AuthError::InvalidCredentials);
        };
        self.sign_in(user).await
    }

    /// Clear the session. Callers return to the sign-in screen afterwards.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Storage` if the session cannot be cleared.
    pub async fn logout(&self) -> Result<(), AuthError> {
        self.users.set_active_user(None).await?;
        if let Some(user) = self.current.write().await.take() {
            log::info!("signed out {}", user.email);
        }
        Ok(())
    }

    /// Simulated password-reset request; nothing is sent.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UnknownEmail` if no account uses `email`.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        if !self.users.email_exists(email).await? {
            return Err(AuthError::UnknownEmail);
        }
        log::info!("password reset requested for {email}");
        Ok(())
    }

    pub async fn current_user(&self) -> Option<User> {
        self.current.read().await.clone()
    }

    async fn sign_in(&self, user: User) -> Result<User, AuthError> {
        self.users.set_active_user(Some(&user)).await?;
        *self.current.write().await = Some(user.clone());
        Ok(user)
    }
}
