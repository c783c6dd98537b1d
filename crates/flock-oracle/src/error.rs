//! Error types for the oracle clients.
//!
//! Uses `thiserror` for typed errors that surface through the decision
//! pipeline: HTTP transport, response extraction, structured parsing,
//! configuration. Scoring failures have their own type because they are
//! recovered differently (a defaulted score, never a failed action).

/// Errors from the decision oracle.
#[derive(Debug, thiserror::Error)]
pub enum OracleError {
    /// The backend returned an error status or was unreachable.
    #[error("oracle backend error: {0}")]
    Backend(String),

    /// The response text could not be parsed into the expected schema.
    #[error("oracle response parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or missing.
    #[error("oracle config error: {0}")]
    Config(String),
}

/// Errors from the bridging-score service.
///
/// These never escape the scorer: after the retry budget is exhausted the
/// score defaults to 0.0 so the simulation is never blocked on scoring.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    /// The scoring API call failed or returned an error status.
    #[error("scoring request failed: {0}")]
    Http(String),

    /// The response did not contain a summary score for an attribute.
    #[error("scoring response missing attribute {0:?}")]
    MissingAttribute(String),
}
