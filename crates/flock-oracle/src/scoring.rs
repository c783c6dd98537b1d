//! Bridging-score client for post quality scoring.
//!
//! Under the `bridging_attributes` timeline strategy, every newly created
//! post gets a [0, 1] bridging score: the mean of several experimental
//! constructive-discourse attributes returned by a comment-analyzer API.
//! The call is best-effort -- after the retry budget is exhausted the
//! score defaults to 0.0 so the simulation never blocks on scoring.

use tracing::warn;

use crate::config::ScoringConfig;
use crate::error::ScoringError;

/// The sub-attributes averaged into the bridging score.
const BRIDGING_ATTRIBUTES: [&str; 7] = [
    "AFFINITY_EXPERIMENTAL",
    "COMPASSION_EXPERIMENTAL",
    "CURIOSITY_EXPERIMENTAL",
    "NUANCE_EXPERIMENTAL",
    "PERSONAL_STORY_EXPERIMENTAL",
    "REASONING_EXPERIMENTAL",
    "RESPECT_EXPERIMENTAL",
];

/// Additional attempts after the first failed call.
const RETRY_BUDGET: u32 = 3;

/// HTTP client for the bridging-score service.
pub struct BridgingScorer {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
}

impl BridgingScorer {
    /// Create a scorer from configuration.
    pub fn new(config: &ScoringConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    /// Score a post's text, retrying on failure and defaulting to 0.0
    /// once the retry budget is exhausted.
    pub async fn score(&self, text: &str) -> f64 {
        let mut attempt: u32 = 0;
        loop {
            match self.try_score(text).await {
                Ok(score) => return score,
                Err(e) if attempt < RETRY_BUDGET => {
                    attempt = attempt.saturating_add(1);
                    warn!(error = %e, attempt, "bridging score call failed, retrying");
                }
                Err(e) => {
                    warn!(error = %e, "bridging score retries exhausted, defaulting to 0.0");
                    return 0.0;
                }
            }
        }
    }

    /// One scoring attempt against the analyzer API.
    async fn try_score(&self, text: &str) -> Result<f64, ScoringError> {
        let mut requested = serde_json::Map::new();
        for attribute in BRIDGING_ATTRIBUTES {
            requested.insert(attribute.to_owned(), serde_json::json!({}));
        }

        let body = serde_json::json!({
            "comment": {"text": text},
            "languages": ["en"],
            "requestedAttributes": requested,
        });

        let url = format!("{}?key={}", self.api_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoringError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScoringError::Http(format!("analyzer returned {status}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ScoringError::Http(format!("response parse failed: {e}")))?;

        average_summary_scores(&json)
    }
}

/// Average the summary scores of all requested attributes, clamped to [0, 1].
fn average_summary_scores(json: &serde_json::Value) -> Result<f64, ScoringError> {
    let mut total = 0.0_f64;
    for attribute in BRIDGING_ATTRIBUTES {
        let value = json
            .get("attributeScores")
            .and_then(|scores| scores.get(attribute))
            .and_then(|a| a.get("summaryScore"))
            .and_then(|s| s.get("value"))
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| ScoringError::MissingAttribute(attribute.to_owned()))?;
        total += value;
    }

    #[allow(clippy::cast_precision_loss)]
    let mean = total / BRIDGING_ATTRIBUTES.len() as f64;
    Ok(mean.clamp(0.0, 1.0))
}
