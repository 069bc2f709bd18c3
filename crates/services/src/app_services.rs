use std::sync::Arc;

use storage::repository::Storage;

use crate::auth_service::AuthService;
use crate::config::TriviaConfig;
use crate::error::AppServicesError;
use crate::game::GameService;
use crate::question_source::{OpenTdbClient, QuestionSource};

/// Assembles app-facing services and restores any persisted session.
#[derive(Clone)]
pub struct AppServices {
    config: TriviaConfig,
    auth: Arc<AuthService>,
    games: Arc<GameService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP question source.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or session restore fails.
    pub async fn new_sqlite(db_url: &str, config: TriviaConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let source: Arc<dyn QuestionSource> = Arc::new(OpenTdbClient::new(config.api_url.clone()));
        Self::from_parts(&storage, source, config).await
    }

    /// Build services from explicit storage and question source.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the persisted session cannot be read.
    pub async fn from_parts(
        storage: &Storage,
        source: Arc<dyn QuestionSource>,
        config: TriviaConfig,
    ) -> Result<Self, AppServicesError> {
        let auth = Arc::new(AuthService::new(Arc::clone(&storage.users)));
        auth.restore_session().await?;
        let games = Arc::new(GameService::new(source, &config));

        Ok(Self {
            config,
            auth,
            games,
        })
    }

    #[must_use]
    pub fn config(&self) -> &TriviaConfig {
        &self.config
    }

    #[must_use]
    pub fn auth(&self) -> Arc<AuthService> {
        Arc::clone(&self.auth)
    }

    #[must_use]
    pub fn games(&self) -> Arc<GameService> {
        Arc::clone(&self.games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::QuestionSourceError;
    use async_trait::async_trait;
    use trivia_core::model::{Question, Registration};

    struct NoQuestions;

    #[async_trait]
    impl QuestionSource for NoQuestions {
        async fn fetch_batch(&self, _count: u32) -> Result<Vec<Question>, QuestionSourceError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn from_parts_restores_existing_session() {
        let storage = Storage::in_memory();
        let first = AppServices::from_parts(&storage, Arc::new(NoQuestions), TriviaConfig::default())
            .await
            .unwrap();
        let user = first
            .auth()
            .register(Registration {
                username: "ana".into(),
                email: "ana@example.com".into(),
                password: "pw".into(),
                confirm_password: "pw".into(),
            })
            .await
            .unwrap();

        let second = AppServices::from_parts(&storage, Arc::new(NoQuestions), TriviaConfig::default())
            .await
            .unwrap();
        assert_eq!(second.auth().current_user().await, Some(user));
        assert_eq!(second.games().batch_size(), 10);
    }
}
