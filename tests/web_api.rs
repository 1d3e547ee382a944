// HTTP surface tests — the axum router driven with tower's `oneshot`.
//
// A stub classifier stands in for the provider so each ClassifyError
// variant can be checked against its status code and JSON body.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use toxic_relay::toxicity::traits::{
    validate_text, ClassifyError, ScoreRecord, ToxicityClassifier,
};
use toxic_relay::web::{build_router, AppState};

/// Validates like the real classifier, then returns a canned outcome.
struct StubClassifier {
    outcome: Result<ScoreRecord, ClassifyError>,
    calls: AtomicUsize,
}

#[async_trait]
impl ToxicityClassifier for StubClassifier {
    async fn classify(&self, text: &str) -> Result<ScoreRecord, ClassifyError> {
        validate_text(text)?;
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }

    fn model_id(&self) -> &str {
        "unitary/toxic-bert"
    }
}

fn app_with(outcome: Result<ScoreRecord, ClassifyError>) -> (Router, Arc<StubClassifier>) {
    let stub = Arc::new(StubClassifier {
        outcome,
        calls: AtomicUsize::new(0),
    });
    (build_router(AppState::new(stub.clone())), stub)
}

fn detect_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/detect-toxic")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn health_probe_reports_model() {
    let (app, _) = app_with(Ok(ScoreRecord::default()));
    let request = Request::builder().uri("/").body(Body::empty()).unwrap();

    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "status": "ok",
            "message": "English Toxic Detection API Running (HF API Mode)",
            "model": "unitary/toxic-bert"
        })
    );
}

#[tokio::test]
async fn detect_returns_all_six_scores() {
    let record = ScoreRecord {
        toxic: 0.97,
        insult: 0.8,
        ..ScoreRecord::default()
    };
    let (app, stub) = app_with(Ok(record));

    let (status, body) = send(app, detect_request(r#"{"text": "You are stupid"}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "toxic": 0.97,
            "severe_toxic": 0.0,
            "obscene": 0.0,
            "threat": 0.0,
            "insult": 0.8,
            "identity_hate": 0.0
        })
    );
    assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn empty_text_is_bad_request() {
    let (app, stub) = app_with(Ok(ScoreRecord::default()));
    let (status, body) = send(app, detect_request(r#"{"text": ""}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text_required" }));
    assert_eq!(stub.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn missing_text_is_bad_request() {
    let (app, _) = app_with(Ok(ScoreRecord::default()));
    let (status, body) = send(app, detect_request("{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text_required" }));
}

#[tokio::test]
async fn invalid_json_is_bad_request() {
    let (app, _) = app_with(Ok(ScoreRecord::default()));
    let (status, body) = send(app, detect_request("{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text_required" }));
}

#[tokio::test]
async fn non_string_text_is_bad_request() {
    let (app, _) = app_with(Ok(ScoreRecord::default()));
    let (status, body) = send(app, detect_request(r#"{"text": 42}"#)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "text_required" }));
}

#[tokio::test]
async fn config_error_is_500() {
    let (app, _) = app_with(Err(ClassifyError::Config(
        "HF_TOKEN is missing in .env file".to_string(),
    )));
    let (status, body) = send(app, detect_request(r#"{"text": "hi"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "config_error", "message": "HF_TOKEN is missing in .env file" })
    );
}

#[tokio::test]
async fn model_loading_is_503_with_retry_after() {
    let (app, _) = app_with(Err(ClassifyError::ModelLoading {
        estimated_time: Some(12.3),
    }));
    let response = app
        .oneshot(detect_request(r#"{"text": "hi"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.headers()[header::RETRY_AFTER], "13");

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"], "model_loading");
    assert_eq!(
        body["message"],
        "Model is loading, please try again in a few seconds."
    );
}

#[tokio::test]
async fn provider_error_passes_status_through() {
    let (app, _) = app_with(Err(ClassifyError::Provider {
        status: 429,
        message: "Rate limit reached".to_string(),
    }));
    let (status, body) = send(app, detect_request(r#"{"text": "hi"}"#)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body,
        json!({ "error": "api_error", "message": "Rate limit reached" })
    );
}

#[tokio::test]
async fn internal_error_is_500() {
    let (app, _) = app_with(Err(ClassifyError::Internal(
        "connection refused".to_string(),
    )));
    let (status, body) = send(app, detect_request(r#"{"text": "hi"}"#)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "internal_server_error", "message": "connection refused" })
    );
}

#[tokio::test]
async fn cors_headers_are_present() {
    let (app, _) = app_with(Ok(ScoreRecord::default()));
    let request = Request::builder()
        .uri("/")
        .header(header::ORIGIN, "http://example.com")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
