//! Point-in-time network views for offline analysis.

use std::collections::BTreeMap;

use serde::Serialize;

use flock_types::{PostId, UserId};

/// One user's state inside a snapshot, persona omitted.
#[derive(Debug, Clone, Serialize)]
pub struct UserSnapshot {
    /// The user's id.
    pub identifier: UserId,
    /// Follower count at snapshot time.
    pub followers: u32,
}

/// The network at the end of one simulation step.
///
/// Appended once per step regardless of whether the step's action
/// succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkSnapshot {
    /// All users, in registration order.
    pub users: Vec<UserSnapshot>,
    /// All follow links.
    pub connections: Vec<(UserId, UserId)>,
    /// Repost count per canonical post.
    pub posts_reposts: BTreeMap<PostId, u32>,
}
