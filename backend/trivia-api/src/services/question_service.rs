use std::sync::Arc;

use crate::metrics::{record_answer_checked, QUESTIONS_SAVED_TOTAL};
use crate::models::{
    AnswerRequest, AnswerResponse, CheckAnswersRequest, CheckAnswersResponse,
    GetQuestionsResponse, QuestionResponse,
};

use super::question_store::QuestionStore;
use super::trivia_client::TriviaSource;

pub const RATE_LIMIT_MESSAGE: &str = "Please wait 5 seconds before retrying";

#[derive(Debug, thiserror::Error)]
pub enum QuestionServiceError {
    /// Any failure while fetching or persisting a batch ends up here, not
    /// only a real upstream rate limit.
    #[error("{}", RATE_LIMIT_MESSAGE)]
    RateLimited,
}

pub struct QuestionService {
    trivia: Arc<dyn TriviaSource>,
    store: Arc<dyn QuestionStore>,
}

impl QuestionService {
    pub fn new(trivia: Arc<dyn TriviaSource>, store: Arc<dyn QuestionStore>) -> Self {
        Self { trivia, store }
    }

    /// Fetches a batch, persists it and shapes it for the client.
    pub async fn retrieve_questions(&self) -> Result<GetQuestionsResponse, QuestionServiceError> {
        let fetched = self.trivia.fetch_questions().await.map_err(|e| {
            tracing::error!("Trivia API call failed, answering with rate limit: {}", e);
            QuestionServiceError::RateLimited
        })?;

        let saved = self.store.save_all(fetched).await.map_err(|e| {
            tracing::error!("Failed to save questions, answering with rate limit: {}", e);
            QuestionServiceError::RateLimited
        })?;

        tracing::info!("Saved {} questions to the database", saved.len());
        QUESTIONS_SAVED_TOTAL.inc_by(saved.len() as u64);

        Ok(GetQuestionsResponse {
            question_response: saved.iter().map(QuestionResponse::from).collect(),
        })
    }

    /// One verdict slot per request, in request order. Never fails.
    pub async fn check_answers(&self, request: CheckAnswersRequest) -> CheckAnswersResponse {
        let mut answer_response = Vec::with_capacity(request.answer_requests.len());
        for answer in request.answer_requests {
            answer_response.push(self.check_answer(answer).await);
        }

        CheckAnswersResponse { answer_response }
    }

    async fn check_answer(&self, answer: AnswerRequest) -> Option<AnswerResponse> {
        let question = match self.store.find_by_id(answer.question_id).await {
            Ok(Some(question)) => question,
            Ok(None) => {
                tracing::warn!(
                    "Could not find question with id {} in database",
                    answer.question_id
                );
                record_answer_checked(None);
                return None;
            }
            Err(e) => {
                tracing::error!(
                    "Failed to look up question {}: {}",
                    answer.question_id,
                    e
                );
                record_answer_checked(None);
                return None;
            }
        };

        let result = answer
            .answer
            .as_deref()
            .is_some_and(|submitted| question.is_correct(submitted));
        record_answer_checked(Some(result));

        Some(AnswerResponse {
            question_id: answer.question_id,
            result,
        })
    }
}
