//! Fatal errors for the simulation runner.
//!
//! Anything that surfaces here aborts the run; per-step failures are
//! recovered inside the platform and never reach this type.

use flock_agents::AgentError;
use flock_oracle::OracleError;
use flock_platform::PlatformError;

/// Errors that terminate a simulation run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A catalog or configuration file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// The offending path.
        path: String,
        /// The underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// A JSON catalog file did not match its expected schema.
    #[error("failed to parse {path}")]
    Parse {
        /// The offending path.
        path: String,
        /// The underlying deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// The YAML run configuration is invalid.
    #[error("invalid run configuration: {0}")]
    Config(#[from] serde_yml::Error),

    /// The persona catalog cannot satisfy the requested party mix.
    #[error("persona catalog has only {available} {party} personas, need {needed}")]
    PersonaShortfall {
        /// The party whose pool ran short.
        party: String,
        /// Personas available for that party.
        available: usize,
        /// Personas the configured mix requires.
        needed: usize,
    },

    /// The run log could not be serialized.
    #[error("run log serialization failed")]
    Serialize(#[from] serde_json::Error),

    /// The run log could not be written to disk.
    #[error("failed to write run log to {path}")]
    WriteLog {
        /// The destination path.
        path: String,
        /// The underlying IO failure.
        #[source]
        source: std::io::Error,
    },

    /// Oracle configuration failure at startup.
    #[error(transparent)]
    Oracle(#[from] OracleError),

    /// Prompt engine construction failure at startup.
    #[error(transparent)]
    Agent(#[from] AgentError),

    /// An engine error escaped the step loop.
    #[error(transparent)]
    Platform(#[from] PlatformError),
}
