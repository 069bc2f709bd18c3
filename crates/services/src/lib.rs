#![forbid(unsafe_code)]

pub mod app_services;
pub mod auth_service;
pub mod config;
pub mod countdown;
pub mod error;
pub mod game;
pub mod question_source;

pub use app_services::AppServices;
pub use auth_service::AuthService;
pub use config::TriviaConfig;
pub use countdown::{GameOutcome, GameUpdate, PlayerInput, QuestionView, TICK, play};
pub use error::{AppServicesError, AuthError, GameError, QuestionSourceError};
pub use game::{GameService, GameStart};
pub use question_source::{OpenTdbClient, QuestionSource};
