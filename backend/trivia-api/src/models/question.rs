use serde::{Deserialize, Serialize};

/// A question as received from the trivia source, before the store has
/// assigned it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl NewQuestion {
    pub fn with_id(self, id: i64) -> Question {
        Question {
            id,
            kind: self.kind,
            difficulty: self.difficulty,
            category: self.category,
            question: self.question,
            correct_answer: self.correct_answer,
            incorrect_answers: self.incorrect_answers,
        }
    }
}

/// Persisted question. `id` is issued by the store and never reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub difficulty: String,
    pub category: String,
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

impl Question {
    /// Incorrect answers in upstream order, followed by the correct answer.
    pub fn answer_options(&self) -> Vec<String> {
        self.incorrect_answers
            .iter()
            .chain(std::iter::once(&self.correct_answer))
            .cloned()
            .collect()
    }

    /// Exact, case-sensitive comparison.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_answer == answer
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResponse {
    pub id: i64,
    pub question: String,
    pub answers: Vec<String>,
}

impl From<&Question> for QuestionResponse {
    fn from(question: &Question) -> Self {
        Self {
            id: question.id,
            question: question.question.clone(),
            answers: question.answer_options(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetQuestionsResponse {
    pub question_response: Vec<QuestionResponse>,
}
