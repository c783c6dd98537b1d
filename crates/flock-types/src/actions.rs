//! Action types exchanged between agents and the platform.
//!
//! The decision oracle answers with a numbered option (1 = repost,
//! 2 = post, 3 = do nothing). [`ActionKind`] is the typed form of that
//! answer; anything outside the known options maps to
//! [`ActionKind::Invalid`], which the platform logs as a failed action
//! without touching any other state.

use serde::{Deserialize, Serialize};

/// The kind of action a user takes in one simulation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Repost an existing post from the timeline.
    Repost,
    /// Write a new post (a news comment).
    Post,
    /// Observe without acting.
    Noop,
    /// The oracle answered with an unknown option or failed outright.
    Invalid,
}

impl ActionKind {
    /// Map the oracle's numeric option onto a typed kind.
    pub const fn from_option(option: i64) -> Self {
        match option {
            1 => Self::Repost,
            2 => Self::Post,
            3 => Self::Noop,
            _ => Self::Invalid,
        }
    }

    /// The label used in the action log.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Repost => "repost",
            Self::Post => "post",
            Self::Noop => "noop",
            Self::Invalid => "invalid",
        }
    }
}

impl core::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully decided action, ready to be applied by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenAction {
    /// What the user decided to do.
    pub kind: ActionKind,
    /// Action payload: the post id to repost, or the text to post.
    pub content: String,
    /// The agent's one-sentence rationale (logged, never applied).
    pub explanation: String,
}

impl ChosenAction {
    /// Build the sentinel action used when the oracle call fails.
    ///
    /// Carries the failure text in the explanation so the action log
    /// still receives exactly one entry for the step.
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            kind: ActionKind::Invalid,
            content: String::new(),
            explanation: reason.into(),
        }
    }
}

/// The oracle's answer to a follow decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkVerdict {
    /// Whether the agent wants to follow the candidate user.
    pub follow: bool,
    /// The agent's short rationale (logged, never stored on the link).
    pub explanation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_mapping_covers_known_range() {
        assert_eq!(ActionKind::from_option(1), ActionKind::Repost);
        assert_eq!(ActionKind::from_option(2), ActionKind::Post);
        assert_eq!(ActionKind::from_option(3), ActionKind::Noop);
        assert_eq!(ActionKind::from_option(0), ActionKind::Invalid);
        assert_eq!(ActionKind::from_option(-1), ActionKind::Invalid);
        assert_eq!(ActionKind::from_option(4), ActionKind::Invalid);
    }

    #[test]
    fn invalid_sentinel_carries_reason() {
        let action = ChosenAction::invalid("timeout talking to backend");
        assert_eq!(action.kind, ActionKind::Invalid);
        assert!(action.content.is_empty());
        assert_eq!(action.explanation, "timeout talking to backend");
    }

    #[test]
    fn kind_serializes_as_snake_case() {
        let json = serde_json::to_string(&ActionKind::Repost).ok();
        assert_eq!(json.as_deref(), Some("\"repost\""));
    }
}
