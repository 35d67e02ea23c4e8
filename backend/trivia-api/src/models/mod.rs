pub mod answer;
pub mod question;
pub mod trivia;

pub use answer::{AnswerRequest, AnswerResponse, CheckAnswersRequest, CheckAnswersResponse};
pub use question::{GetQuestionsResponse, NewQuestion, Question, QuestionResponse};
pub use trivia::{TriviaQuestion, TriviaResponse};
