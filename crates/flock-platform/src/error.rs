//! Error types for the platform engine.
//!
//! Every variant here is recovered locally by `apply_action` (logged as
//! a failed action); none of them aborts a run.

use std::num::ParseIntError;

use flock_types::{PostId, UserId};

/// Errors surfaced by the platform's state mutators.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PlatformError {
    /// No user is registered under the given id.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No post or placement exists under the given id.
    #[error("post {0} not found")]
    PostNotFound(PostId),

    /// The user has already reposted the underlying post.
    #[error("user {user} already reposted post {post}")]
    AlreadyReposted {
        /// The reposting user.
        user: UserId,
        /// The post id the repost targeted.
        post: PostId,
    },

    /// A user tried to repost their own post.
    #[error("user {user} cannot repost their own post {post}")]
    SelfRepost {
        /// The reposting user.
        user: UserId,
        /// The post id the repost targeted.
        post: PostId,
    },

    /// The repost action content did not parse as a post id.
    #[error("invalid post reference {reference:?}")]
    InvalidPostReference {
        /// The unparseable action content.
        reference: String,
        /// The underlying integer parse failure.
        #[source]
        source: ParseIntError,
    },
}
