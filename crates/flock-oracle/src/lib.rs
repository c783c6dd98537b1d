//! Oracle clients for the Flock simulation.
//!
//! Two external services drive the simulation: the decision oracle (an
//! LLM that picks each agent's action and answers follow decisions) and
//! the bridging-score service (a comment analyzer scoring post quality
//! under the bridging timeline strategy). This crate owns both HTTP
//! clients plus the structured-response parsing and cost accounting
//! around them.
//!
//! # Modules
//!
//! - [`config`] -- Backend and scorer configuration from the environment
//! - [`cost`] -- Token cost estimation on [`rust_decimal::Decimal`]
//! - [`error`] -- [`OracleError`] and [`ScoringError`]
//! - [`llm`] -- Enum-dispatch LLM backends (OpenAI-compatible, Anthropic)
//! - [`parse`] -- Structured-response parsing with recovery strategies
//! - [`scoring`] -- Bridging-score client with a bounded retry budget
//!
//! [`OracleError`]: error::OracleError
//! [`ScoringError`]: error::ScoringError

pub mod config;
pub mod cost;
pub mod error;
pub mod llm;
pub mod parse;
pub mod scoring;

pub use config::{BackendType, OracleBackendConfig, ScoringConfig};
pub use cost::CostModel;
pub use error::{OracleError, ScoringError};
pub use llm::{LlmBackend, OracleReply, RenderedPrompt, create_backend};
pub use parse::{parse_action, parse_biography, parse_verdict};
pub use scoring::BridgingScorer;
