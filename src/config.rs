use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::time::Duration;

use crate::toxicity::retry::LoadingRetry;

/// Hugging Face router endpoint for hosted inference models.
pub const DEFAULT_API_BASE: &str = "https://router.huggingface.co/hf-inference/models";

/// The toxicity model this relay was built around.
pub const DEFAULT_MODEL_ID: &str = "unitary/toxic-bert";

pub const DEFAULT_PORT: u16 = 3000;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded at startup via dotenvy, so anything here can
/// also come from there. Secrets are never hardcoded.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bearer token for the inference API. `None` when HF_TOKEN is unset or empty.
    pub hf_token: Option<String>,
    pub port: u16,
    pub bind_addr: String,
    pub model_id: String,
    /// Base URL the model id is appended to.
    pub api_base: String,
    /// Bound on each outbound inference call.
    pub request_timeout: Duration,
    pub loading_retry: LoadingRetry,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hf_token: None,
            port: DEFAULT_PORT,
            bind_addr: "0.0.0.0".to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: Duration::from_secs(30),
            loading_retry: LoadingRetry::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default except HF_TOKEN. A missing token is not an
    /// error here: the server still starts and reports `config_error` per
    /// request. Malformed numbers are.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let loading_retry = LoadingRetry {
            max_retries: parse_var("HF_LOADING_RETRIES")?
                .unwrap_or(defaults.loading_retry.max_retries),
            base_delay: parse_var("HF_LOADING_RETRY_BASE_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.loading_retry.base_delay),
            max_delay: parse_var("HF_LOADING_RETRY_MAX_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.loading_retry.max_delay),
        };

        Ok(Self {
            hf_token: env::var("HF_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            model_id: env::var("HF_MODEL_ID").unwrap_or(defaults.model_id),
            api_base: env::var("HF_API_BASE").unwrap_or(defaults.api_base),
            request_timeout: parse_var("HF_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            loading_retry,
        })
    }

    /// Full inference URL for the configured model.
    pub fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.model_id.trim_start_matches('/')
        )
    }

    /// Check that the inference API token is configured.
    /// Call this before any operation that can't proceed without it.
    pub fn require_hf_token(&self) -> Result<&str> {
        match self.hf_token.as_deref() {
            Some(token) => Ok(token),
            None => anyhow::bail!(
                "HF_TOKEN not set. Add it to your .env file.\n\
                 Create a token at https://huggingface.co/settings/tokens"
            ),
        }
    }
}

/// Read and parse an optional env var. Unset or empty is `None`.
fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("Invalid value for {name}: {raw:?}")),
        _ => Ok(None),
    }
}
