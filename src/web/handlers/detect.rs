// POST /detect-toxic — classify a piece of text.
//
// Returns the six-label ScoreRecord on success. Every failure is a JSON
// body of the form {"error": code, "message": ...} with a status taken
// from ClassifyError.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::toxicity::traits::ClassifyError;
use crate::web::{api_error, AppState};

#[derive(Debug, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// POST /detect-toxic — score `text` for toxicity.
///
/// A body that can't be read as `{"text": string}` counts as missing text.
pub async fn detect_toxic(
    State(state): State<AppState>,
    payload: Result<Json<DetectRequest>, JsonRejection>,
) -> Response {
    let text = match payload {
        Ok(Json(body)) => body.text.unwrap_or_default(),
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "Rejected detect-toxic body");
            String::new()
        }
    };

    match state.classifier.classify(&text).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for ClassifyError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::BAD_GATEWAY);
        let message = self.message();
        let mut response = api_error(status, self.error_code(), message.as_deref());

        if let ClassifyError::ModelLoading {
            estimated_time: Some(secs),
        } = self
        {
            if secs.is_finite() && secs > 0.0 {
                let retry_after = HeaderValue::from(secs.ceil() as u64);
                response.headers_mut().insert(header::RETRY_AFTER, retry_after);
            }
        }
        response
    }
}
