use async_trait::async_trait;
use mongodb::{
    bson::doc,
    options::{FindOneAndUpdateOptions, ReturnDocument},
    Database,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewQuestion, Question};

const QUESTIONS_COLLECTION: &str = "questions";
const COUNTERS_COLLECTION: &str = "counters";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("id sequence '{0}' could not be advanced")]
    Sequence(String),
}

/// Append-only question persistence. Ids are issued by the store.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Persists the batch and returns it with ids assigned, in input order.
    async fn save_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct SequenceDocument {
    #[serde(rename = "_id")]
    id: String,
    seq: i64,
}

pub struct MongoQuestionStore {
    mongo: Database,
}

impl MongoQuestionStore {
    pub fn new(mongo: Database) -> Self {
        Self { mongo }
    }

    /// Atomically advances the sequence by `count` and returns the first id
    /// of the reserved block.
    async fn reserve_ids(&self, count: i64) -> Result<i64, StoreError> {
        let counters = self
            .mongo
            .collection::<SequenceDocument>(COUNTERS_COLLECTION);

        let sequence = counters
            .find_one_and_update(
                doc! { "_id": QUESTIONS_COLLECTION },
                doc! { "$inc": { "seq": count } },
            )
            .with_options(
                FindOneAndUpdateOptions::builder()
                    .upsert(true)
                    .return_document(ReturnDocument::After)
                    .build(),
            )
            .await?
            .ok_or_else(|| StoreError::Sequence(QUESTIONS_COLLECTION.to_string()))?;

        Ok(sequence.seq - count + 1)
    }
}

#[async_trait]
impl QuestionStore for MongoQuestionStore {
    async fn save_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, StoreError> {
        if questions.is_empty() {
            return Ok(Vec::new());
        }

        let first_id = self.reserve_ids(questions.len() as i64).await?;
        let questions: Vec<Question> = questions
            .into_iter()
            .zip(first_id..)
            .map(|(question, id)| question.with_id(id))
            .collect();

        let collection: mongodb::Collection<Question> =
            self.mongo.collection(QUESTIONS_COLLECTION);
        collection.insert_many(&questions).await?;

        tracing::debug!(
            "Inserted questions {}..={} into MongoDB",
            first_id,
            first_id + questions.len() as i64 - 1
        );
        Ok(questions)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, StoreError> {
        let collection: mongodb::Collection<Question> =
            self.mongo.collection(QUESTIONS_COLLECTION);

        Ok(collection.find_one(doc! { "_id": id }).await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.mongo.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct QuestionTable {
    last_id: i64,
    rows: BTreeMap<i64, Question>,
}

/// Process-local store, ids start at 1. Id issue and insert happen under one
/// write lock.
#[derive(Debug, Default)]
pub struct InMemoryQuestionStore {
    table: RwLock<QuestionTable>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.table.read().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    async fn save_all(&self, questions: Vec<NewQuestion>) -> Result<Vec<Question>, StoreError> {
        let mut table = self.table.write().await;

        let saved = questions
            .into_iter()
            .map(|question| {
                table.last_id += 1;
                let question = question.with_id(table.last_id);
                table.rows.insert(question.id, question.clone());
                question
            })
            .collect();

        Ok(saved)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Question>, StoreError> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
