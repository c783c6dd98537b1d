//! Closed option sets for the platform configuration surface.
//!
//! The link-formation policy and the timeline selection strategy are both
//! fixed for the duration of a run. They deserialize through closed enums
//! so an invalid configuration string fails at load time instead of
//! surfacing as a runtime branch miss.

use serde::{Deserialize, Serialize};

/// Error returned when a configuration string does not name a known
/// link-formation policy.
#[derive(Debug, thiserror::Error)]
#[error("unknown link policy: {0:?} (expected always-on-repost, oracle-gated-with-profile, or oracle-gated-posts-only)")]
pub struct ParseLinkPolicyError(pub String);

/// Error returned when a configuration string does not name a known
/// timeline strategy.
#[derive(Debug, thiserror::Error)]
#[error("unknown timeline strategy: {0:?}")]
pub struct ParseStrategyError(pub String);

/// The rule governing whether a follow link is created after a repost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkPolicy {
    /// Link the reposter to the original author unconditionally.
    #[serde(rename = "always-on-repost")]
    AlwaysOnRepost,
    /// Ask the reposting agent's oracle, showing the author's biography
    /// alongside their recent posts.
    #[serde(rename = "oracle-gated-with-profile")]
    OracleGatedWithProfile,
    /// Ask the reposting agent's oracle, showing recent posts only.
    #[serde(rename = "oracle-gated-posts-only")]
    OracleGatedPostsOnly,
}

impl LinkPolicy {
    /// Whether this policy consults the decision oracle before linking.
    pub const fn consults_oracle(self) -> bool {
        !matches!(self, Self::AlwaysOnRepost)
    }

    /// Whether the link prompt includes the candidate's biography.
    pub const fn shows_biography(self) -> bool {
        matches!(self, Self::OracleGatedWithProfile)
    }

    /// The canonical configuration string for this policy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlwaysOnRepost => "always-on-repost",
            Self::OracleGatedWithProfile => "oracle-gated-with-profile",
            Self::OracleGatedPostsOnly => "oracle-gated-posts-only",
        }
    }
}

impl core::str::FromStr for LinkPolicy {
    type Err = ParseLinkPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "always-on-repost" => Ok(Self::AlwaysOnRepost),
            "oracle-gated-with-profile" => Ok(Self::OracleGatedWithProfile),
            "oracle-gated-posts-only" => Ok(Self::OracleGatedPostsOnly),
            other => Err(ParseLinkPolicyError(other.to_owned())),
        }
    }
}

impl core::fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The algorithm selecting which candidate posts are recommended to a
/// user each step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineStrategy {
    /// Uniform draw without replacement over the full candidate pool.
    Random,
    /// Draw without replacement, weight = reposts + 1.
    RandomWeighted,
    /// Draw without replacement favoring posts with fewer reposts.
    RandomWeightedReversed,
    /// Deterministic top-5 by precomputed bridging score.
    BridgingAttributes,
    /// Deterministic top-5 by timestamp, newest first.
    Chronological,
    /// Draw biased toward popular posts from ideologically distant authors.
    OtherPartisan,
}

impl TimelineStrategy {
    /// Whether new posts need an eagerly computed bridging score under
    /// this strategy.
    pub const fn needs_bridging_scores(self) -> bool {
        matches!(self, Self::BridgingAttributes)
    }

    /// The canonical configuration string for this strategy.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Random => "random",
            Self::RandomWeighted => "random_weighted",
            Self::RandomWeightedReversed => "random_weighted_reversed",
            Self::BridgingAttributes => "bridging_attributes",
            Self::Chronological => "chronological",
            Self::OtherPartisan => "other_partisan",
        }
    }
}

impl core::str::FromStr for TimelineStrategy {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "random" => Ok(Self::Random),
            "random_weighted" => Ok(Self::RandomWeighted),
            "random_weighted_reversed" => Ok(Self::RandomWeightedReversed),
            "bridging_attributes" => Ok(Self::BridgingAttributes),
            "chronological" => Ok(Self::Chronological),
            "other_partisan" => Ok(Self::OtherPartisan),
            other => Err(ParseStrategyError(other.to_owned())),
        }
    }
}

impl core::fmt::Display for TimelineStrategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_policy_roundtrip() {
        for policy in [
            LinkPolicy::AlwaysOnRepost,
            LinkPolicy::OracleGatedWithProfile,
            LinkPolicy::OracleGatedPostsOnly,
        ] {
            let parsed: Result<LinkPolicy, _> = policy.as_str().parse();
            assert_eq!(parsed.ok(), Some(policy));
        }
    }

    #[test]
    fn unknown_policy_rejected() {
        let parsed: Result<LinkPolicy, _> = "on_repost".parse();
        assert!(parsed.is_err());
    }

    #[test]
    fn strategy_serde_uses_snake_case() {
        let json = serde_json::to_string(&TimelineStrategy::RandomWeightedReversed).ok();
        assert_eq!(json.as_deref(), Some("\"random_weighted_reversed\""));

        let parsed: Result<TimelineStrategy, _> =
            serde_json::from_str("\"other_partisan\"");
        assert_eq!(parsed.ok(), Some(TimelineStrategy::OtherPartisan));
    }

    #[test]
    fn unknown_strategy_rejected() {
        let parsed: Result<TimelineStrategy, _> = serde_json::from_str("\"newest_first\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn oracle_consultation_flags() {
        assert!(!LinkPolicy::AlwaysOnRepost.consults_oracle());
        assert!(LinkPolicy::OracleGatedWithProfile.consults_oracle());
        assert!(LinkPolicy::OracleGatedWithProfile.shows_biography());
        assert!(LinkPolicy::OracleGatedPostsOnly.consults_oracle());
        assert!(!LinkPolicy::OracleGatedPostsOnly.shows_biography());
    }

    #[test]
    fn bridging_flag_only_for_bridging_strategy() {
        assert!(TimelineStrategy::BridgingAttributes.needs_bridging_scores());
        assert!(!TimelineStrategy::Random.needs_bridging_scores());
        assert!(!TimelineStrategy::Chronological.needs_bridging_scores());
    }
}
