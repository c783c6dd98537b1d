//! Shared type definitions for the Flock social network simulation.
//!
//! This crate is the single source of truth for the data model shared
//! across the Flock workspace: typed identifiers, personas, token usage
//! counters, action kinds, configuration enums, and the read-only view
//! models handed to agents.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe sequential-integer wrappers for entity identifiers
//! - [`enums`] -- Closed option sets (link policy, timeline strategy)
//! - [`actions`] -- Decided actions and follow verdicts
//! - [`persona`] -- Opaque persona descriptors from the persona catalog
//! - [`usage`] -- Per-user token usage counters
//! - [`views`] -- Prompt-ready snapshots (posts, link prospects, news)

pub mod actions;
pub mod enums;
pub mod ids;
pub mod persona;
pub mod usage;
pub mod views;

// Re-export all public types at crate root for convenience.
pub use actions::{ActionKind, ChosenAction, LinkVerdict};
pub use enums::{LinkPolicy, ParseLinkPolicyError, ParseStrategyError, TimelineStrategy};
pub use ids::{PostId, UserId};
pub use persona::Persona;
pub use usage::TokenUsage;
pub use views::{LinkProspect, NewsItem, PostView};
