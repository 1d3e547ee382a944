// Toxicity classifier trait — the seam between the HTTP layer and the provider.
//
// The web handlers and the CLI only ever talk to `dyn ToxicityClassifier`.
// HuggingFaceClassifier is the production implementation; tests plug in
// stubs without touching the network.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Normalized six-label toxicity scores (all 0.0 to 1.0).
///
/// All six fields are always serialized, even when the provider didn't
/// return a score for that label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub toxic: f64,
    pub severe_toxic: f64,
    pub obscene: f64,
    pub threat: f64,
    pub insult: f64,
    pub identity_hate: f64,
}

impl ScoreRecord {
    /// Label names in the order they appear in the JSON output.
    pub const LABELS: [&'static str; 6] = [
        "toxic",
        "severe_toxic",
        "obscene",
        "threat",
        "insult",
        "identity_hate",
    ];

    /// Look up a score by its exact label name.
    pub fn get(&self, label: &str) -> Option<f64> {
        match label {
            "toxic" => Some(self.toxic),
            "severe_toxic" => Some(self.severe_toxic),
            "obscene" => Some(self.obscene),
            "threat" => Some(self.threat),
            "insult" => Some(self.insult),
            "identity_hate" => Some(self.identity_hate),
            _ => None,
        }
    }

    /// Assign `score` to the field named `label`, clamped into [0, 1].
    ///
    /// Returns false (and changes nothing) when the label isn't one of the six.
    pub fn set(&mut self, label: &str, score: f64) -> bool {
        let slot = match label {
            "toxic" => &mut self.toxic,
            "severe_toxic" => &mut self.severe_toxic,
            "obscene" => &mut self.obscene,
            "threat" => &mut self.threat,
            "insult" => &mut self.insult,
            "identity_hate" => &mut self.identity_hate,
            _ => return false,
        };
        *slot = if score.is_nan() {
            0.0
        } else {
            score.clamp(0.0, 1.0)
        };
        true
    }

    /// `(label, score)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        Self::LABELS
            .into_iter()
            .map(move |label| (label, self.get(label).unwrap_or(0.0)))
    }
}

/// Failure modes of a classification call.
///
/// Each variant maps to exactly one HTTP status and JSON error code at the
/// web boundary (see `web::handlers::detect`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifyError {
    /// The text was missing or only whitespace.
    #[error("text is required")]
    InputRequired,

    /// The provider credential isn't configured.
    #[error("configuration error: {0}")]
    Config(String),

    /// The provider is still loading the model. Retryable.
    #[error("model is loading")]
    ModelLoading {
        /// Provider's estimate of seconds until the model is ready, if given.
        estimated_time: Option<f64>,
    },

    /// The provider answered with a non-success status.
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    /// Transport or decoding failure on our side of the call.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClassifyError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InputRequired => 400,
            Self::Config(_) | Self::Internal(_) => 500,
            Self::ModelLoading { .. } => 503,
            Self::Provider { status, .. } => *status,
        }
    }

    /// Stable machine-readable code used in the JSON `error` field.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InputRequired => "text_required",
            Self::Config(_) => "config_error",
            Self::ModelLoading { .. } => "model_loading",
            Self::Provider { .. } => "api_error",
            Self::Internal(_) => "internal_server_error",
        }
    }

    /// Human-readable message for the JSON `message` field.
    /// `InputRequired` carries none.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::InputRequired => None,
            Self::Config(message) | Self::Internal(message) => Some(message.clone()),
            Self::ModelLoading { .. } => {
                Some("Model is loading, please try again in a few seconds.".to_string())
            }
            Self::Provider { message, .. } => Some(message.clone()),
        }
    }

    /// Whether the caller may reasonably retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ModelLoading { .. })
    }
}

/// Reject empty or whitespace-only input.
pub fn validate_text(text: &str) -> Result<&str, ClassifyError> {
    if text.trim().is_empty() {
        return Err(ClassifyError::InputRequired);
    }
    Ok(text)
}

/// Trait for classifying text toxicity. Async because every real
/// implementation calls out over HTTP.
#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    /// Classify a single text.
    async fn classify(&self, text: &str) -> Result<ScoreRecord, ClassifyError>;

    /// Identifier of the model behind this classifier.
    fn model_id(&self) -> &str;
}
