use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;

use crate::{
    extractors::AppJson,
    models::{CheckAnswersRequest, CheckAnswersResponse, GetQuestionsResponse},
    services::{question_service::QuestionServiceError, AppState},
};

/// Seconds a client should wait after a 429.
const RETRY_AFTER_SECS: &str = "5";

pub async fn get_questions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<GetQuestionsResponse>, ApiError> {
    tracing::info!("/questions endpoint called");

    let service = state.question_service();
    let response = service.retrieve_questions().await?;

    Ok(Json(response))
}

pub async fn check_answers(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CheckAnswersRequest>,
) -> Json<CheckAnswersResponse> {
    tracing::info!(
        "/checkanswers endpoint called with {} answers",
        req.answer_requests.len()
    );

    let service = state.question_service();
    Json(service.check_answers(req).await)
}

#[derive(Debug)]
pub enum ApiError {
    TooManyRequests(String),
}

impl From<QuestionServiceError> for ApiError {
    fn from(err: QuestionServiceError) -> Self {
        match err {
            QuestionServiceError::RateLimited => ApiError::TooManyRequests(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::TooManyRequests(message) => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, RETRY_AFTER_SECS)],
                Json(json!({
                    "message": message,
                    "status": StatusCode::TOO_MANY_REQUESTS.as_u16()
                })),
            )
                .into_response(),
        }
    }
}
