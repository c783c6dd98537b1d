//! Configuration for the oracle clients.
//!
//! Secrets and endpoints are loaded from environment variables so the
//! YAML run configuration can stay free of credentials. The decision
//! oracle needs a backend type, URL, key, and model; the bridging scorer
//! needs a URL and key.

use crate::error::OracleError;

/// Default endpoint for the bridging-score (comment analyzer) service.
const DEFAULT_SCORING_URL: &str =
    "https://commentanalyzer.googleapis.com/v1alpha1/comments:analyze";

/// Supported decision oracle backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// `OpenAI`-compatible chat completions API.
    OpenAi,
    /// Anthropic Messages API (different request format).
    Anthropic,
}

/// Configuration for a single decision oracle backend.
#[derive(Debug, Clone)]
pub struct OracleBackendConfig {
    /// The backend type.
    pub backend_type: BackendType,
    /// Base API URL (e.g. `https://api.openai.com/v1`).
    pub api_url: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model identifier (e.g. `gpt-4o-mini`).
    pub model: String,
}

impl OracleBackendConfig {
    /// Load the decision oracle configuration from environment variables.
    ///
    /// Required: `ORACLE_BACKEND` (`openai` or `anthropic`),
    /// `ORACLE_API_URL`, `ORACLE_API_KEY`, `ORACLE_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Config`] if a variable is missing or the
    /// backend type is unknown.
    pub fn from_env() -> Result<Self, OracleError> {
        let backend = env_var("ORACLE_BACKEND")?;
        let backend_type = match backend.to_lowercase().as_str() {
            "openai" => BackendType::OpenAi,
            "anthropic" => BackendType::Anthropic,
            other => {
                return Err(OracleError::Config(format!(
                    "unknown ORACLE_BACKEND: {other} (expected openai or anthropic)"
                )));
            }
        };

        Ok(Self {
            backend_type,
            api_url: env_var("ORACLE_API_URL")?,
            api_key: env_var("ORACLE_API_KEY")?,
            model: env_var("ORACLE_MODEL")?,
        })
    }
}

/// Configuration for the bridging-score service.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    /// Analyzer endpoint URL.
    pub api_url: String,
    /// API key, appended as a query parameter.
    pub api_key: String,
}

impl ScoringConfig {
    /// Load the scoring configuration from environment variables.
    ///
    /// Required: `SCORING_API_KEY`. Optional: `SCORING_API_URL`
    /// (defaults to the public comment analyzer endpoint).
    ///
    /// # Errors
    ///
    /// Returns [`OracleError::Config`] if the key is missing.
    pub fn from_env() -> Result<Self, OracleError> {
        Ok(Self {
            api_url: std::env::var("SCORING_API_URL")
                .unwrap_or_else(|_| DEFAULT_SCORING_URL.to_owned()),
            api_key: env_var("SCORING_API_KEY")?,
        })
    }
}

/// Read a required environment variable.
fn env_var(name: &str) -> Result<String, OracleError> {
    std::env::var(name)
        .map_err(|_err| OracleError::Config(format!("missing environment variable {name}")))
}
