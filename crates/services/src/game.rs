use std::sync::Arc;

use trivia_core::{QuizError, QuizSession, QuizSummary};

use crate::config::TriviaConfig;
use crate::error::GameError;
use crate::question_source::QuestionSource;

/// What the caller should show after asking for a new game.
#[derive(Debug)]
pub enum GameStart {
    /// Questions are loaded; drive the session with [`crate::play`].
    Active(QuizSession),
    /// Nothing to play; go straight to the results.
    Finished(QuizSummary),
}

/// Fetches a batch and starts a quiz session. Each call is a fresh game.
#[derive(Clone)]
pub struct GameService {
    source: Arc<dyn QuestionSource>,
    batch_size: u32,
    seconds_per_question: u32,
}

impl GameService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, config: &TriviaConfig) -> Self {
        Self {
            source,
            batch_size: config.batch_size,
            seconds_per_question: config.seconds_per_question,
        }
    }

    #[must_use]
    pub fn batch_size(&self) -> u32 {
        self.batch_size
    }

    /// Fetch questions and move a new session into `Active`.
    ///
    /// An empty batch is not an error here: it yields `GameStart::Finished`
    /// with a zero score.
    ///
    /// # Errors
    ///
    /// Returns `GameError::Source` if the question source fails.
    pub async fn start_game(&self) -> Result<GameStart, GameError> {
        let questions = self.source.fetch_batch(self.batch_size).await?;
        let mut session = QuizSession::with_time_limit(self.seconds_per_question);
        match session.start(questions) {
            Ok(()) => Ok(GameStart::Active(session)),
            Err(QuizError::EmptyBatch) => {
                log::warn!("question source returned an empty batch");
                Ok(GameStart::Finished(QuizSummary::default()))
            }
            Err(err) => Err(err.into()),
        }
    }
}
