//! Agent layer for the Flock simulation.
//!
//! Sits between the platform and the oracle crate: [`PromptEngine`]
//! renders the embedded prompt templates, and [`Agent`] wraps one
//! simulated user's persona and oracle-backed decisions.

pub mod agent;
pub mod error;
pub mod prompts;

pub use agent::Agent;
pub use error::AgentError;
pub use prompts::PromptEngine;
