// Web server — Axum-based JSON API in front of the toxicity classifier.
//
// Two routes: a liveness/identity probe at `/` and the classification
// endpoint at `/detect-toxic`. Every response, including failures, is JSON.

use std::sync::Arc;

use anyhow::Result;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::toxicity::traits::ToxicityClassifier;

pub mod handlers;

/// Shared application state threaded through all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn ToxicityClassifier>,
}

impl AppState {
    pub fn new(classifier: Arc<dyn ToxicityClassifier>) -> Self {
        Self { classifier }
    }
}

/// Start the Axum web server and block until it exits.
pub async fn run_server(state: AppState, port: u16, bind: &str) -> Result<()> {
    let model_id = state.classifier.model_id().to_string();
    let app = build_router(state);

    let addr = format!("{bind}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Toxicity relay listening on http://{addr}");
    info!("Using Hugging Face model: {model_id}");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Build the router with CORS and request tracing applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::health::health))
        .route("/detect-toxic", post(handlers::detect::detect_toxic))
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Typed JSON error response helper.
///
/// Produces `{"error": code}` or `{"error": code, "message": message}`.
pub fn api_error(status: StatusCode, code: &str, message: Option<&str>) -> Response {
    let body = match message {
        Some(message) => serde_json::json!({ "error": code, "message": message }),
        None => serde_json::json!({ "error": code }),
    };
    (status, axum::Json(body)).into_response()
}
