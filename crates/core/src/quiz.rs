use std::fmt;

use thiserror::Error;

use crate::model::Question;

/// Default countdown per question, in seconds.
pub const SECONDS_PER_QUESTION: u32 = 30;

/// Points awarded for each correct answer.
pub const POINTS_PER_CORRECT: u32 = 100;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available for this game")]
    EmptyBatch,

    #[error("quiz is not active")]
    NotActive,

    #[error("quiz has already started")]
    AlreadyStarted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    Loading,
    Active,
    Finished,
}

/// How a single question was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    TimedOut,
}

/// Observable result of a tick, submit or timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    /// Countdown decremented; still on the same question.
    Ticked { remaining: u32 },
    /// Moved to the question at `index` with a fresh countdown.
    Next { index: usize },
    /// Last question resolved; the game is over.
    Finished { score: u32 },
}

/// Final tally handed to the results screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizSummary {
    pub score: u32,
    pub correct: usize,
    pub total: usize,
}

/// Quiz state machine: `Loading -> Active -> Finished`.
///
/// Holds the question batch, the pointer into it, the running score and the
/// remaining seconds for the current question. The index never moves
/// backwards and stays within `0..len` while active.
pub struct QuizSession {
    questions: Vec<Question>,
    current: usize,
    score: u32,
    time_remaining: u32,
    seconds_per_question: u32,
    phase: QuizPhase,
    outcomes: Vec<AnswerOutcome>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    /// A session waiting for its question batch.
    #[must_use]
    pub fn new() -> Self {
        Self::with_time_limit(SECONDS_PER_QUESTION)
    }

    /// A waiting session with a custom per-question countdown (minimum 1s).
    #[must_use]
    pub fn with_time_limit(seconds_per_question: u32) -> Self {
        let seconds_per_question = seconds_per_question.max(1);
        Self {
            questions: Vec::new(),
            current: 0,
            score: 0,
            time_remaining: seconds_per_question,
            seconds_per_question,
            phase: QuizPhase::Loading,
            outcomes: Vec::new(),
        }
    }

    /// Load the batch and begin the first question.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyBatch` if `questions` is empty; callers should
    /// then go straight to the results with a score of zero.
    /// Returns `QuizError::AlreadyStarted` if the session left `Loading`.
    pub fn start(&mut self, questions: Vec<Question>) -> Result<(), QuizError> {
        if self.phase != QuizPhase::Loading {
            return Err(QuizError::AlreadyStarted);
        }
        if questions.is_empty() {
            return Err(QuizError::EmptyBatch);
        }

        self.outcomes = Vec::with_capacity(questions.len());
        self.questions = questions;
        self.current = 0;
        self.score = 0;
        self.time_remaining = self.seconds_per_question;
        self.phase = QuizPhase::Active;
        Ok(())
    }

    /// One second elapsed. Reaching zero resolves the question as a timeout.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` outside the `Active` phase.
    pub fn tick(&mut self) -> Result<QuizStep, QuizError> {
        self.ensure_active()?;
        self.time_remaining = self.time_remaining.saturating_sub(1);
        if self.time_remaining == 0 {
            return self.timeout();
        }
        Ok(QuizStep::Ticked {
            remaining: self.time_remaining,
        })
    }

    /// Answer the current question and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` outside the `Active` phase.
    pub fn submit(&mut self, candidate: &str) -> Result<QuizStep, QuizError> {
        let question = self.current_question().ok_or(QuizError::NotActive)?;
        let outcome = if question.is_correct(candidate) {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        };
        if outcome == AnswerOutcome::Correct {
            self.score = self.score.saturating_add(POINTS_PER_CORRECT);
        }
        self.outcomes.push(outcome);
        Ok(self.advance())
    }

    /// Resolve the current question without an answer and advance.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NotActive` outside the `Active` phase.
    pub fn timeout(&mut self) -> Result<QuizStep, QuizError> {
        self.ensure_active()?;
        self.outcomes.push(AnswerOutcome::TimedOut);
        Ok(self.advance())
    }

    fn advance(&mut self) -> QuizStep {
        if self.current + 1 >= self.questions.len() {
            self.phase = QuizPhase::Finished;
            self.time_remaining = 0;
            return QuizStep::Finished { score: self.score };
        }

        self.current += 1;
        self.time_remaining = self.seconds_per_question;
        QuizStep::Next {
            index: self.current,
        }
    }

    fn ensure_active(&self) -> Result<(), QuizError> {
        if self.phase == QuizPhase::Active {
            Ok(())
        } else {
            Err(QuizError::NotActive)
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == QuizPhase::Finished
    }

    /// The question awaiting an answer, if the session is active.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.phase == QuizPhase::Active {
            self.questions.get(self.current)
        } else {
            None
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    #[must_use]
    pub fn seconds_per_question(&self) -> u32 {
        self.seconds_per_question
    }

    #[must_use]
    pub fn outcomes(&self) -> &[AnswerOutcome] {
        &self.outcomes
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| **outcome == AnswerOutcome::Correct)
            .count()
    }

    #[must_use]
    pub fn summary(&self) -> QuizSummary {
        QuizSummary {
            score: self.score,
            correct: self.correct_count(),
            total: self.questions.len(),
        }
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("time_remaining", &self.time_remaining)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn question(prompt: &str, correct: &str) -> Question {
        let mut rng = StdRng::seed_from_u64(11);
        Question::new(prompt, correct, vec!["wrong".into(), "also wrong".into()], &mut rng)
    }

    fn started(questions: Vec<Question>) -> QuizSession {
        let mut session = QuizSession::new();
        session.start(questions).unwrap();
        session
    }

    #[test]
    fn start_initialises_active_state() {
        let session = started(vec![question("q1", "a")]);
        assert_eq!(session.phase(), QuizPhase::Active);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.time_remaining(), SECONDS_PER_QUESTION);
    }

    #[test]
    fn start_rejects_empty_batch() {
        let mut session = QuizSession::new();
        assert_eq!(session.start(Vec::new()), Err(QuizError::EmptyBatch));
        assert_eq!(session.phase(), QuizPhase::Loading);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut session = started(vec![question("q1", "a")]);
        assert_eq!(
            session.start(vec![question("q2", "b")]),
            Err(QuizError::AlreadyStarted)
        );
    }

    #[test]
    fn submit_before_start_is_rejected() {
        let mut session = QuizSession::new();
        assert_eq!(session.submit("a"), Err(QuizError::NotActive));
        assert_eq!(session.tick(), Err(QuizError::NotActive));
    }

    #[test]
    fn correct_then_timeout_scores_one_hundred() {
        let mut session = started(vec![question("Capital?", "Paris"), question("Answer?", "42")]);

        assert_eq!(session.submit("Paris"), Ok(QuizStep::Next { index: 1 }));
        assert_eq!(session.timeout(), Ok(QuizStep::Finished { score: 100 }));
        assert!(session.is_finished());
        assert_eq!(session.score(), 100);
        assert_eq!(
            session.outcomes(),
            &[AnswerOutcome::Correct, AnswerOutcome::TimedOut]
        );
    }

    #[test]
    fn wrong_answer_leaves_score_unchanged() {
        let mut session = started(vec![question("q1", "a"), question("q2", "b")]);
        session.submit("nope").unwrap();
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_remaining(), SECONDS_PER_QUESTION);
    }

    #[test]
    fn n_resolutions_finish_with_score_per_correct() {
        let questions: Vec<_> = (0..5)
            .map(|i| question(&format!("q{i}"), &format!("a{i}")))
            .collect();
        let mut session = started(questions);

        let mut last_index = 0;
        for i in 0..5 {
            assert_eq!(session.phase(), QuizPhase::Active);
            assert!(session.current_index() >= last_index);
            assert!(session.current_index() <= 4);
            last_index = session.current_index();
            if i % 2 == 0 {
                session.submit(&format!("a{i}")).unwrap();
            } else {
                session.timeout().unwrap();
            }
        }

        assert!(session.is_finished());
        assert_eq!(session.score(), 300);
        assert_eq!(session.correct_count(), 3);
        assert_eq!(
            session.summary(),
            QuizSummary {
                score: 300,
                correct: 3,
                total: 5
            }
        );
        assert_eq!(session.submit("a4"), Err(QuizError::NotActive));
        assert_eq!(session.timeout(), Err(QuizError::NotActive));
    }

    #[test]
    fn thirty_ticks_equal_one_timeout() {
        let mut ticked = started(vec![question("q1", "a"), question("q2", "b")]);
        let mut timed_out = started(vec![question("q1", "a"), question("q2", "b")]);

        let mut last = None;
        for _ in 0..SECONDS_PER_QUESTION {
            last = Some(ticked.tick().unwrap());
        }
        let expected = timed_out.timeout().unwrap();

        assert_eq!(last, Some(expected));
        assert_eq!(ticked.current_index(), timed_out.current_index());
        assert_eq!(ticked.score(), timed_out.score());
        assert_eq!(ticked.time_remaining(), SECONDS_PER_QUESTION);
    }

    #[test]
    fn ticks_on_last_question_finish_the_game() {
        let mut session = started(vec![question("q1", "a")]);
        for remaining in (1..SECONDS_PER_QUESTION).rev() {
            assert_eq!(session.tick(), Ok(QuizStep::Ticked { remaining }));
        }
        assert_eq!(session.tick(), Ok(QuizStep::Finished { score: 0 }));
        assert_eq!(session.current_question(), None);
    }

    #[test]
    fn custom_time_limit_is_used_per_question() {
        let mut session = QuizSession::with_time_limit(3);
        session
            .start(vec![question("q1", "a"), question("q2", "b")])
            .unwrap();
        assert_eq!(session.time_remaining(), 3);
        session.tick().unwrap();
        session.tick().unwrap();
        assert_eq!(session.tick(), Ok(QuizStep::Next { index: 1 }));
        assert_eq!(session.time_remaining(), 3);
    }
}
