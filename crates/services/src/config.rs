use std::env;

pub const DEFAULT_API_URL: &str = "https://opentdb.com/api.php";
pub const DEFAULT_BATCH_SIZE: u32 = 10;

/// Runtime knobs for fetching and playing a game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TriviaConfig {
    pub api_url: String,
    pub batch_size: u32,
    pub seconds_per_question: u32,
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            batch_size: DEFAULT_BATCH_SIZE,
            seconds_per_question: trivia_core::quiz::SECONDS_PER_QUESTION,
        }
    }
}

impl TriviaConfig {
    /// Read `TRIVIA_API_URL`, `TRIVIA_BATCH_SIZE` and
    /// `TRIVIA_SECONDS_PER_QUESTION`, keeping defaults for missing or invalid values.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_url = lookup("TRIVIA_API_URL")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or(defaults.api_url);
        let batch_size = lookup("TRIVIA_BATCH_SIZE")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.batch_size);
        let seconds_per_question = lookup("TRIVIA_SECONDS_PER_QUESTION")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(defaults.seconds_per_question);

        Self {
            api_url,
            batch_size,
            seconds_per_question,
        }
    }

    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}
