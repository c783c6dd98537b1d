//! Canonical posts and placement records.
//!
//! A repost never duplicates content: it appends a new [`Placement`]
//! pointing at the same canonical [`Post`] and bumps that post's repost
//! bookkeeping. Post ids and placement ids draw from one shared
//! monotonically increasing sequence, so any id seen on a timeline can
//! be resolved back to a canonical post.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use flock_types::{PostId, UserId};

/// A canonical post: immutable content plus repost bookkeeping.
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    /// Unique id, shared sequence with placement ids.
    pub post_id: PostId,
    /// The originating user (never a reposter).
    pub author: UserId,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// The post text, immutable after creation.
    pub content: String,
    /// Number of successful reposts.
    pub reposts: u32,
    /// Users that have reposted this post; each at most once.
    pub reposters: BTreeSet<UserId>,
    /// Quality score in [0, 1], computed at creation only under the
    /// bridging timeline strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bridging_score: Option<f64>,
}

impl Post {
    /// Create a fresh post with no reposts.
    pub const fn new(
        post_id: PostId,
        author: UserId,
        timestamp: DateTime<Utc>,
        content: String,
        bridging_score: Option<f64>,
    ) -> Self {
        Self {
            post_id,
            author,
            timestamp,
            content,
            reposts: 0,
            reposters: BTreeSet::new(),
            bridging_score,
        }
    }

    /// Whether the given user has already reposted this post.
    pub fn reposted_by(&self, user: UserId) -> bool {
        self.reposters.contains(&user)
    }

    /// Register a repost. The caller must have checked
    /// [`reposted_by`](Self::reposted_by) first.
    pub(crate) fn count_repost(&mut self, reposter: UserId) {
        if self.reposters.insert(reposter) {
            self.reposts = self.reposts.saturating_add(1);
        }
    }
}

/// One appearance of a post in the global stream, original or repost.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Placement {
    /// This placement's own id.
    #[serde(rename = "post_id")]
    pub id: PostId,
    /// The user who placed it (the author, or the reposter).
    pub user_id: UserId,
    /// When it was placed.
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,
    /// Non-owning reference to the canonical post.
    pub post: PostId,
}
