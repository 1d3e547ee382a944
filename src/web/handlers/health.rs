// GET / — liveness and identity probe.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::web::AppState;

pub const HEALTH_MESSAGE: &str = "English Toxic Detection API Running (HF API Mode)";

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": HEALTH_MESSAGE,
        "model": state.classifier.model_id(),
    }))
}
