//! Error types for the agent layer.

use flock_oracle::OracleError;

/// Errors that can occur while an agent prepares or processes a decision.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// Failed to render a prompt template.
    #[error("template render error: {0}")]
    Template(String),

    /// The decision oracle failed or answered outside its schema.
    #[error("oracle error: {source}")]
    Oracle {
        /// The underlying oracle error.
        #[from]
        source: OracleError,
    },
}
