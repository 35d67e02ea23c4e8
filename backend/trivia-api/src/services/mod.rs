use std::sync::Arc;

use crate::config::{Config, StorageBackend};

use question_service::QuestionService;
use question_store::{InMemoryQuestionStore, MongoQuestionStore, QuestionStore};
use trivia_client::{TriviaClient, TriviaSource};

pub struct AppState {
    pub config: Config,
    pub trivia: Arc<dyn TriviaSource>,
    pub store: Arc<dyn QuestionStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let trivia: Arc<dyn TriviaSource> = Arc::new(TriviaClient::from_config(&config)?);

        let store: Arc<dyn QuestionStore> = match config.storage_backend {
            StorageBackend::Mongo => {
                let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri).await?;
                tracing::info!("MongoDB client created for {}", config.mongo_database);
                Arc::new(MongoQuestionStore::new(
                    mongo_client.database(&config.mongo_database),
                ))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory question store, data is lost on restart");
                Arc::new(InMemoryQuestionStore::new())
            }
        };

        Ok(Self::with_components(config, trivia, store))
    }

    pub fn with_components(
        config: Config,
        trivia: Arc<dyn TriviaSource>,
        store: Arc<dyn QuestionStore>,
    ) -> Self {
        Self {
            config,
            trivia,
            store,
        }
    }

    pub fn question_service(&self) -> QuestionService {
        QuestionService::new(self.trivia.clone(), self.store.clone())
    }
}

pub mod question_service;
pub mod question_store;
pub mod trivia_client;
