//! Read-only view models handed to agents.
//!
//! The platform never exposes its mutable state to agents; instead it
//! builds these prompt-ready snapshots. The prompt templates decide which
//! fields are shown (follower and repost counts are hidden when the run
//! is configured with `show_info = false`).

use serde::{Deserialize, Serialize};

use crate::ids::{PostId, UserId};

/// One post as it appears on a timeline or a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    /// Canonical id of the underlying post (what a repost must target).
    pub post_id: PostId,
    /// Follower count of the original author at render time.
    pub author_followers: u32,
    /// Repost count at render time.
    pub reposts: u32,
    /// The post text.
    pub content: String,
}

/// Everything an agent sees when deciding whether to follow a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkProspect {
    /// The candidate user's id.
    pub user_id: UserId,
    /// The candidate's follower count, present only when visible.
    pub followers: Option<u32>,
    /// The candidate's biography, present only under the with-profile
    /// link policy.
    pub biography: Option<String>,
    /// The post whose repost triggered this decision.
    pub triggering_content: String,
    /// Up to five of the candidate's most recent placements.
    pub recent_posts: Vec<PostView>,
}

/// One news item from the static catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// The headline text.
    pub headline: String,
    /// The catalog category label.
    pub category: String,
    /// A one-or-two sentence summary.
    pub short_description: String,
}
