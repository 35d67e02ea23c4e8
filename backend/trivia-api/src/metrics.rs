use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, Encoder,
    HistogramVec, IntCounter, IntCounterVec, TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Upstream trivia source
    pub static ref TRIVIA_FETCH_TOTAL: IntCounterVec = register_int_counter_vec!(
        "trivia_fetch_total",
        "Calls to the trivia question bank by outcome",
        &["outcome"]
    )
    .unwrap();

    // Business Metrics
    pub static ref QUESTIONS_SAVED_TOTAL: IntCounter = register_int_counter!(
        "questions_saved_total",
        "Total number of questions persisted"
    )
    .unwrap();

    pub static ref ANSWERS_CHECKED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_checked_total",
        "Total number of submitted answers checked",
        &["result"]
    )
    .unwrap();
}

/// Outcome label for `trivia_fetch_total`.
#[derive(Debug, Clone, Copy)]
pub enum FetchOutcome {
    Success,
    Empty,
    RateLimited,
    TransportError,
}

impl FetchOutcome {
    fn as_str(self) -> &'static str {
        match self {
            FetchOutcome::Success => "success",
            FetchOutcome::Empty => "empty",
            FetchOutcome::RateLimited => "rate_limited",
            FetchOutcome::TransportError => "transport_error",
        }
    }
}

pub fn record_fetch(outcome: FetchOutcome) {
    TRIVIA_FETCH_TOTAL
        .with_label_values(&[outcome.as_str()])
        .inc();
}

/// `verdict` is `None` when the question id was not found.
pub fn record_answer_checked(verdict: Option<bool>) {
    let label = match verdict {
        Some(true) => "correct",
        Some(false) => "incorrect",
        None => "missing",
    };
    ANSWERS_CHECKED_TOTAL.with_label_values(&[label]).inc();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}
