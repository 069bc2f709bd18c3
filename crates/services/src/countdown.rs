//! Drives an active quiz with a one-second countdown.
//!
//! At most one interval exists per game. It lives inside [`play`] and is
//! dropped as soon as the game finishes, the player quits, or either channel
//! is closed, so no tick ever fires against a finished session.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use trivia_core::{QuizError, QuizSession, QuizStep, QuizSummary};

use crate::error::GameError;

/// Real-time tick period.
pub const TICK: Duration = Duration::from_secs(1);

/// Events coming from the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerInput {
    Answer(String),
    Quit,
}

/// Read-only snapshot of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub answers: Vec<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub score: u32,
    pub time_remaining: u32,
}

impl QuestionView {
    fn from_session(session: &QuizSession) -> Option<Self> {
        let question = session.current_question()?;
        Some(Self {
            index: session.current_index(),
            total: session.total_questions(),
            prompt: question.prompt().to_owned(),
            answers: question.answers().to_vec(),
            category: question.category().map(str::to_owned),
            difficulty: question.difficulty().map(str::to_owned),
            score: session.score(),
            time_remaining: session.time_remaining(),
        })
    }
}

/// Events going to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameUpdate {
    Question(QuestionView),
    Tick { remaining: u32 },
    Finished(QuizSummary),
    Abandoned { score: u32 },
}

/// How a call to [`play`] ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Finished(QuizSummary),
    Abandoned { score: u32 },
}

/// Run `session` to completion.
///
/// Ticks every `tick` while waiting for input; the countdown restarts whenever
/// the session moves to the next question.
///
/// # Errors
///
/// Returns `GameError::Quiz` if `session` is not active.
pub async fn play(
    mut session: QuizSession,
    mut inputs: mpsc::Receiver<PlayerInput>,
    updates: mpsc::Sender<GameUpdate>,
    tick: Duration,
) -> Result<GameOutcome, GameError> {
    let Some(first) = QuestionView::from_session(&session) else {
        return Err(QuizError::NotActive.into());
    };
    if updates.send(GameUpdate::Question(first)).await.is_err() {
        return Ok(abandon(&session, None).await);
    }

    let mut countdown = time::interval_at(Instant::now() + tick, tick);
    countdown.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let step = tokio::select! {
            _ = countdown.tick() => session.tick()?,
            input = inputs.recv() => match input {
                Some(PlayerInput::Answer(answer)) => session.submit(&answer)?,
                Some(PlayerInput::Quit) | None => {
                    return Ok(abandon(&session, Some(&updates)).await);
                }
            },
        };

        let update = match step {
            QuizStep::Ticked { remaining } => GameUpdate::Tick { remaining },
            QuizStep::Next { index } => {
                log::debug!("advancing to question {index}");
                countdown.reset();
                match QuestionView::from_session(&session) {
                    Some(view) => GameUpdate::Question(view),
                    None => return Err(QuizError::NotActive.into()),
                }
            }
            QuizStep::Finished { score } => {
                log::info!("game finished with score {score}");
                let summary = session.summary();
                if updates.send(GameUpdate::Finished(summary)).await.is_err() {
                    log::debug!("update receiver closed before the final summary");
                }
                return Ok(GameOutcome::Finished(summary));
            }
        };

        if updates.send(update).await.is_err() {
            return Ok(abandon(&session, None).await);
        }
    }
}

async fn abandon(session: &QuizSession, updates: Option<&mpsc::Sender<GameUpdate>>) -> GameOutcome {
    let score = session.score();
    log::info!("game abandoned with score {score}");
    if let Some(updates) = updates {
        if updates.send(GameUpdate::Abandoned { score }).await.is_err() {
            log::debug!("update receiver closed before the abandon notice");
        }
    }
    GameOutcome::Abandoned { score }
}
