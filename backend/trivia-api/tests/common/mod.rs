#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    extract::Query,
    http::{header, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};
use tower::ServiceExt;
use trivia_api::{
    config::{Config, StorageBackend},
    create_router,
    models::NewQuestion,
    services::{
        question_store::InMemoryQuestionStore,
        trivia_client::{TriviaClient, TriviaSource},
        AppState,
    },
};

/// Canned trivia question bank listening on a random local port.
pub struct Upstream {
    pub url: String,
    pub requests: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl Upstream {
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub async fn spawn_upstream(status: StatusCode, body: impl Into<String>) -> Upstream {
    let body = body.into();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    let app = Router::new().route(
        "/api.php",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let body = body.clone();
            let seen = seen.clone();
            async move {
                seen.lock().unwrap().push(params);
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Upstream {
        url: format!("http://{}/api.php", addr),
        requests,
    }
}

/// A URL nothing listens on.
pub async fn unreachable_upstream_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api.php", addr)
}

pub fn test_config(trivia_api_url: &str) -> Config {
    Config {
        storage_backend: StorageBackend::Memory,
        trivia_api_url: trivia_api_url.to_string(),
        metrics_auth: "metrics:secret".to_string(),
        ..Config::default()
    }
}

pub fn create_test_app(trivia_api_url: &str) -> (Router, Arc<InMemoryQuestionStore>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = test_config(trivia_api_url);
    let trivia: Arc<dyn TriviaSource> = Arc::new(
        TriviaClient::from_config(&config).expect("Failed to build trivia client"),
    );
    let store = Arc::new(InMemoryQuestionStore::new());

    let app_state = Arc::new(AppState::with_components(config, trivia, store.clone()));

    (create_router(app_state), store)
}

pub fn new_question(question: &str, correct: &str, incorrect: &[&str]) -> NewQuestion {
    NewQuestion {
        kind: "multiple".to_string(),
        difficulty: "hard".to_string(),
        category: "programming".to_string(),
        question: question.to_string(),
        correct_answer: correct.to_string(),
        incorrect_answers: incorrect.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn two_programming_questions() -> Vec<NewQuestion> {
    vec![
        new_question(
            "what is the best programming language?",
            "Java",
            &["C#", "Python", "Scala"],
        ),
        new_question(
            "How do you start a new project?",
            "Print 'Hello World!'",
            &["Open up IntelliJ", "Read the docu", "Phone a Friend"],
        ),
    ]
}

/// Upstream payload in the question bank's own wire format.
pub fn upstream_body(response_code: i32, questions: &[NewQuestion]) -> String {
    json!({
        "response_code": response_code,
        "results": questions.iter().map(|q| json!({
            "type": q.kind,
            "difficulty": q.difficulty,
            "category": q.category,
            "question": q.question,
            "correct_answer": q.correct_answer,
            "incorrect_answers": q.incorrect_answers,
        })).collect::<Vec<_>>()
    })
    .to_string()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}
