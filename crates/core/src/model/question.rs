use rand::Rng;

use crate::shuffle::shuffle_answers;

/// A single trivia question with its answer choices already permuted.
///
/// Immutable once built; text is stored decoded (plain Unicode).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    answers: Vec<String>,
    category: Option<String>,
    difficulty: Option<String>,
}

impl Question {
    /// Build a question, shuffling `incorrect_answers` plus `correct_answer`
    /// into a single answer list.
    #[must_use]
    pub fn new<R: Rng + ?Sized>(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        incorrect_answers: Vec<String>,
        rng: &mut R,
    ) -> Self {
        let correct_answer = correct_answer.into();
        let mut answers = incorrect_answers;
        answers.push(correct_answer.clone());
        shuffle_answers(&mut answers, rng);

        Self {
            prompt: prompt.into(),
            correct_answer,
            answers,
            category: None,
            difficulty: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<String>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    #[must_use]
    pub fn difficulty(&self) -> Option<&str> {
        self.difficulty.as_deref()
    }

    /// Exact string comparison against the correct answer.
    #[must_use]
    pub fn is_correct(&self, candidate: &str) -> bool {
        self.correct_answer == candidate
    }
}
