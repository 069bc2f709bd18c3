#![forbid(unsafe_code)]

pub mod model;
pub mod quiz;
pub mod shuffle;

pub use quiz::{AnswerOutcome, QuizError, QuizPhase, QuizSession, QuizStep, QuizSummary};
