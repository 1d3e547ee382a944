// Hugging Face hosted-inference implementation.
//
// Sends `{"inputs": text}` to the configured text-classification model with
// a bearer token, then remaps whatever labels come back onto the fixed
// six-field ScoreRecord. Provider failures are sorted into the
// ClassifyError taxonomy; nothing is retried unless a LoadingRetry policy
// is configured.
//
// API docs: https://huggingface.co/docs/inference-providers/tasks/text-classification

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

use super::response::{is_model_loading, ProviderErrorBody, ProviderResponse};
use super::retry::LoadingRetry;
use super::traits::{validate_text, ClassifyError, ScoreRecord, ToxicityClassifier};
use crate::config::Config;
use crate::output::truncate_chars;

/// Fallback message when the provider's error body has no usable `error` field.
const FALLBACK_ERROR_MESSAGE: &str = "Error from Hugging Face API";

/// Status reported when the outbound call exceeds the configured timeout.
const TIMEOUT_STATUS: u16 = 504;

/// Toxicity classifier backed by a Hugging Face hosted model.
pub struct HuggingFaceClassifier {
    client: Client,
    api_token: Option<String>,
    model_id: String,
    model_url: String,
    loading_retry: LoadingRetry,
}

impl HuggingFaceClassifier {
    /// Build a classifier from the loaded configuration.
    ///
    /// A missing token is allowed here; `classify` reports it as
    /// `ClassifyError::Config` without touching the network.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("toxic-relay/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            api_token: config.hf_token.clone(),
            model_id: config.model_id.clone(),
            model_url: config.model_url(),
            loading_retry: config.loading_retry,
        })
    }

    /// One POST to the provider, mapped into the error taxonomy.
    async fn call_once(&self, token: &str, text: &str) -> Result<ScoreRecord, ClassifyError> {
        let response = self
            .client
            .post(&self.model_url)
            .bearer_auth(token)
            .json(&InferenceRequest { inputs: text })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.map_err(transport_error)?;
            return Err(classify_failure(status.as_u16(), &body));
        }

        let payload: ProviderResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                return transport_error(e);
            }
            ClassifyError::Internal(format!("Failed to parse Hugging Face response: {e}"))
        })?;

        Ok(payload.into_record())
    }
}

#[async_trait]
impl ToxicityClassifier for HuggingFaceClassifier {
    async fn classify(&self, text: &str) -> Result<ScoreRecord, ClassifyError> {
        let text = validate_text(text)?;

        let token = self.api_token.as_deref().ok_or_else(|| {
            ClassifyError::Config("HF_TOKEN is missing in .env file".to_string())
        })?;

        let mut attempt = 0;
        loop {
            match self.call_once(token, text).await {
                Ok(record) => {
                    debug!(
                        toxic = record.toxic,
                        insult = record.insult,
                        text_preview = %truncate_chars(text, 50),
                        "Classified text"
                    );
                    return Ok(record);
                }
                Err(ClassifyError::ModelLoading { estimated_time })
                    if attempt < self.loading_retry.max_retries =>
                {
                    debug!(
                        attempt = attempt + 1,
                        estimated_time = ?estimated_time,
                        "Model loading, retrying"
                    );
                    self.loading_retry.wait(attempt, estimated_time).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Map a non-success provider response to a ClassifyError.
///
/// The "model loading" check applies regardless of the exact status code.
/// A body that isn't JSON at all is an internal failure.
pub fn classify_failure(status: u16, body: &str) -> ClassifyError {
    let parsed = match ProviderErrorBody::parse(body) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(status, error = %e, "Unreadable Hugging Face error response");
            return ClassifyError::Internal(format!(
                "Failed to parse Hugging Face error response: {e}"
            ));
        }
    };
    let message = parsed.message();
    warn!(status, error = ?message, "Hugging Face API error");

    match message {
        Some(msg) if is_model_loading(&msg) => ClassifyError::ModelLoading {
            estimated_time: parsed.estimated_time,
        },
        Some(msg) => ClassifyError::Provider {
            status,
            message: msg,
        },
        None => ClassifyError::Provider {
            status,
            message: FALLBACK_ERROR_MESSAGE.to_string(),
        },
    }
}

fn transport_error(err: reqwest::Error) -> ClassifyError {
    if err.is_timeout() {
        warn!("Hugging Face API request timed out");
        return ClassifyError::Provider {
            status: TIMEOUT_STATUS,
            message: "Hugging Face API request timed out".to_string(),
        };
    }
    warn!(error = %err, "Hugging Face API request failed");
    ClassifyError::Internal(err.to_string())
}

// --- Inference API request type ---

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}
