//! The run-log document and the action log it contains.
//!
//! The run log is the single JSON artifact consumed by offline analysis.
//! It is written once at run end, and additionally as a checkpoint when
//! a run dies, so its construction must never fail.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use flock_agents::Agent;
use flock_types::{ActionKind, Persona, PostId, UserId};

use crate::post::Post;
use crate::snapshot::NetworkSnapshot;

/// One entry in the append-only action log.
#[derive(Debug, Clone, Serialize)]
pub struct ActionRecord {
    /// The acting user.
    pub user_id: UserId,
    /// What the user tried to do.
    pub action: ActionKind,
    /// The action payload (post text, or the targeted post id).
    pub content: String,
    /// Whether the action was applied.
    pub success: bool,
    /// The prompt the agent saw when deciding.
    pub prompt: String,
}

/// A registered user as persisted in the run log.
#[derive(Debug, Clone, Serialize)]
pub struct UserRecord {
    /// The user's id.
    pub identifier: UserId,
    /// The full persona record.
    pub persona: Persona,
    /// Final follower count.
    pub followers: u32,
    /// Prompt tokens consumed by this user's oracle calls.
    pub used_tokens_input: u64,
    /// Completion tokens consumed by this user's oracle calls.
    pub used_tokens_output: u64,
    /// Cached prompt tokens reported for this user's oracle calls.
    pub used_tokens_cached: u64,
}

impl UserRecord {
    /// Build the log record for one agent.
    pub fn from_agent(agent: &Agent) -> Self {
        let usage = agent.usage();
        Self {
            identifier: agent.id(),
            persona: agent.persona().clone(),
            followers: agent.followers(),
            used_tokens_input: usage.input,
            used_tokens_output: usage.output,
            used_tokens_cached: usage.cached,
        }
    }
}

/// A placement with its canonical post embedded.
#[derive(Debug, Clone, Serialize)]
pub struct PlacementEntry {
    /// The placement's own id.
    pub post_id: PostId,
    /// The placing user (author or reposter).
    pub user_id: UserId,
    /// When the placement happened.
    pub time: DateTime<Utc>,
    /// The canonical post, at its end-of-run state.
    pub post: Post,
}

/// The persisted run log.
#[derive(Debug, Clone, Serialize)]
pub struct RunLog {
    /// Prompt tokens summed over all users.
    pub total_tokens_input: u64,
    /// Completion tokens summed over all users.
    pub total_tokens_output: u64,
    /// Cached prompt tokens summed over all users.
    pub total_tokens_cached: u64,
    /// Estimated dollar cost of the run's oracle calls.
    pub predicted_cost: Decimal,
    /// All users, persona included.
    pub users: Vec<UserRecord>,
    /// The full placement stream with embedded posts.
    pub posts: Vec<PlacementEntry>,
    /// Original posts only.
    pub raw_posts: Vec<Post>,
    /// All follow links, `from` follows `to`.
    pub user_links: Vec<(UserId, UserId)>,
    /// The action log.
    pub actions: Vec<ActionRecord>,
    /// One snapshot per simulation step.
    pub network_snapshots: Vec<NetworkSnapshot>,
}
