// Hugging Face inference response shapes and label remapping.
//
// Text-classification models answer with either a flat list of
// {label, score} pairs or a batch-of-one list wrapping that list. Both are
// accepted here and flattened once before mapping onto a ScoreRecord.

use serde::Deserialize;
use tracing::debug;

use super::traits::ScoreRecord;

/// One `{label, score}` pair as returned by the provider.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

/// Successful provider payload, flat or singly nested.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ProviderResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ProviderResponse {
    /// Flatten one level: a nested response contributes its first inner list.
    pub fn into_scores(self) -> Vec<LabelScore> {
        match self {
            Self::Nested(batches) => batches.into_iter().next().unwrap_or_default(),
            Self::Flat(scores) => scores,
        }
    }

    /// Normalize and remap onto the fixed six-label record.
    pub fn into_record(self) -> ScoreRecord {
        remap_labels(&self.into_scores())
    }
}

/// Build a ScoreRecord from provider pairs by exact label name.
///
/// Starts from all zeros. Labels outside the six known ones are skipped;
/// a repeated label keeps its last score.
pub fn remap_labels(scores: &[LabelScore]) -> ScoreRecord {
    let mut record = ScoreRecord::default();
    for item in scores {
        if !record.set(&item.label, item.score) {
            debug!(label = %item.label, "Ignoring unknown provider label");
        }
    }
    record
}

/// Error payload returned alongside non-success statuses.
///
/// `error` is usually a string but some endpoints send a list of strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub error: Option<serde_json::Value>,
    #[serde(default)]
    pub estimated_time: Option<f64>,
}

impl ProviderErrorBody {
    /// Parse an error body.
    ///
    /// Fails only when the body isn't JSON. Valid JSON of another shape
    /// (a bare string, a list) yields an empty body.
    pub fn parse(body: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(body)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    /// The `error` field flattened to a single message.
    /// Missing, null or empty messages are `None`.
    pub fn message(&self) -> Option<String> {
        let message = match self.error.as_ref()? {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .filter_map(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join("; "),
            serde_json::Value::Null => return None,
            other => other.to_string(),
        };
        Some(message).filter(|m| !m.is_empty())
    }
}

/// Heuristic for "the model is still warming up".
///
/// The provider has no stable error code for this, so it's a plain
/// substring match on the error message. Keep every check for this
/// condition going through here.
pub fn is_model_loading(message: &str) -> bool {
    message.contains("loading")
}
