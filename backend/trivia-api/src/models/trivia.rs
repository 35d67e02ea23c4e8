use serde::{Deserialize, Serialize};

use super::question::NewQuestion;

/// Upstream response code for a successful batch.
pub const RESPONSE_CODE_SUCCESS: i32 = 0;
/// Upstream response code sent when too many requests hit the same IP.
pub const RESPONSE_CODE_RATE_LIMIT: i32 = 5;

/// Payload returned by the trivia question bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaResponse {
    pub response_code: i32,
    #[serde(default)]
    pub results: Vec<TriviaQuestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    #[serde(default)]
    pub incorrect_answers: Vec<String>,
}

impl From<TriviaQuestion> for NewQuestion {
    fn from(item: TriviaQuestion) -> Self {
        Self {
            kind: item.kind,
            difficulty: item.difficulty,
            category: item.category,
            question: item.question,
            correct_answer: item.correct_answer,
            incorrect_answers: item.incorrect_answers,
        }
    }
}
