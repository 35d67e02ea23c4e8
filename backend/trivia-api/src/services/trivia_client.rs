use async_trait::async_trait;
use std::time::Duration;

use crate::config::Config;
use crate::metrics::{record_fetch, FetchOutcome};
use crate::models::trivia::{TriviaResponse, RESPONSE_CODE_RATE_LIMIT, RESPONSE_CODE_SUCCESS};
use crate::models::NewQuestion;

#[derive(Debug, thiserror::Error)]
pub enum TriviaClientError {
    #[error("trivia API rate limit reached")]
    RateLimited,

    #[error("trivia API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("trivia API returned an unreadable body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of freshly generated questions.
#[async_trait]
pub trait TriviaSource: Send + Sync {
    async fn fetch_questions(&self) -> Result<Vec<NewQuestion>, TriviaClientError>;
}

/// Single-shot client for the trivia question bank. No retries.
#[derive(Clone, Debug)]
pub struct TriviaClient {
    http: reqwest::Client,
    api_url: String,
    batch_size: u32,
}

impl TriviaClient {
    pub fn new(
        api_url: impl Into<String>,
        batch_size: u32,
        timeout: Option<Duration>,
    ) -> Result<Self, TriviaClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            api_url: api_url.into(),
            batch_size,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TriviaClientError> {
        Self::new(
            config.trivia_api_url.clone(),
            config.trivia_batch_size,
            config.trivia_timeout,
        )
    }

    async fn request(&self) -> Result<Option<TriviaResponse>, TriviaClientError> {
        // The upstream answers HTTP 429 with a regular JSON body, so the
        // status is not checked here; the response code inside decides.
        let body = self
            .http
            .get(&self.api_url)
            .query(&[("amount", self.batch_size)])
            .send()
            .await?
            .bytes()
            .await?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TriviaSource for TriviaClient {
    async fn fetch_questions(&self) -> Result<Vec<NewQuestion>, TriviaClientError> {
        tracing::debug!(
            "Requesting {} questions from {}",
            self.batch_size,
            self.api_url
        );

        let response = match self.request().await {
            Ok(response) => response,
            Err(e) => {
                record_fetch(FetchOutcome::TransportError);
                return Err(e);
            }
        };

        questions_from_response(response)
    }
}

/// Maps the upstream response code: 0 yields the batch, 5 is a rate limit,
/// anything else (including no body at all) is an empty batch.
pub fn questions_from_response(
    response: Option<TriviaResponse>,
) -> Result<Vec<NewQuestion>, TriviaClientError> {
    let Some(response) = response else {
        tracing::warn!("Trivia API returned no body");
        record_fetch(FetchOutcome::Empty);
        return Ok(Vec::new());
    };

    match response.response_code {
        RESPONSE_CODE_SUCCESS => {
            record_fetch(FetchOutcome::Success);
            Ok(response.results.into_iter().map(NewQuestion::from).collect())
        }
        RESPONSE_CODE_RATE_LIMIT => {
            record_fetch(FetchOutcome::RateLimited);
            Err(TriviaClientError::RateLimited)
        }
        // 1-4 complain about parameters this client never sends
        code => {
            tracing::warn!("Trivia API answered with response code {}", code);
            record_fetch(FetchOutcome::Empty);
            Ok(Vec::new())
        }
    }
}
