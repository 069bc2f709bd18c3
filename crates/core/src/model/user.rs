use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A registered player as persisted in the user collection.
///
/// Passwords are stored and compared as plaintext. This is demo behaviour kept
/// on purpose; do not treat it as a credential format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub score: u32,
}

impl User {
    /// Exact, case-sensitive credential match.
    #[must_use]
    pub fn matches(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistrationError {
    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Raw sign-up form input, validated into a [`User`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl Registration {
    /// Validate the form and build a fresh user with a zero score.
    ///
    /// Values are kept as typed; emails are not normalised.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError::MissingField` for blank fields and
    /// `RegistrationError::PasswordMismatch` when the confirmation differs.
    pub fn validate(self) -> Result<User, RegistrationError> {
        for (field, value) in [
            ("username", &self.username),
            ("email", &self.email),
            ("password", &self.password),
        ] {
            if value.trim().is_empty() {
                return Err(RegistrationError::MissingField { field });
            }
        }

        if self.password != self.confirm_password {
            return Err(RegistrationError::PasswordMismatch);
        }

        Ok(User {
            username: self.username,
            email: self.email,
            password: self.password,
            score: 0,
        })
    }
}
