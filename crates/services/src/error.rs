//! Shared error types for the services crate.

use thiserror::Error;

use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;
use trivia_core::QuizError;
use trivia_core::model::RegistrationError;

/// Errors emitted by `AuthService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuthError {
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email is not registered")]
    UnknownEmail,
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by a `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question service unreachable: {0}")]
    SourceUnavailable(#[from] reqwest::Error),
    #[error("question service rejected the request (response code {code})")]
    SourceRejected { code: i64 },
    #[error("question service returned status {0}")]
    HttpStatus(reqwest::StatusCode),
}

/// Errors emitted while starting or playing a game.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Source(#[from] QuestionSourceError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}
