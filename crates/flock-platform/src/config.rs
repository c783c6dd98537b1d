//! Behavioral configuration for one simulation run.

use serde::Deserialize;

use flock_types::{LinkPolicy, TimelineStrategy};

/// Platform options, fixed for the duration of a run.
///
/// Deserializes from the run configuration file; the enum fields reject
/// unknown strings at load time.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// When a repost creates a follow link.
    pub link_policy: LinkPolicy,
    /// How the recommended timeline part is selected.
    pub strategy: TimelineStrategy,
    /// Whether follower and repost counts are visible to agents.
    pub show_info: bool,
    /// Bias constant `k` in the `other_partisan` weighting formula.
    pub partisan_bias: f64,
    /// Seed for the platform's random number generator.
    pub seed: u64,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            link_policy: LinkPolicy::AlwaysOnRepost,
            strategy: TimelineStrategy::Random,
            show_info: true,
            partisan_bias: 3.0,
            seed: 42,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let parsed: Result<PlatformConfig, _> =
            serde_json::from_str(r#"{"strategy": "chronological"}"#);
        let Ok(config) = parsed else {
            assert!(parsed.is_ok());
            return;
        };
        assert_eq!(config.strategy, TimelineStrategy::Chronological);
        assert_eq!(config.link_policy, LinkPolicy::AlwaysOnRepost);
        assert!(config.show_info);
        assert!((config.partisan_bias - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_policy_string_fails_at_load() {
        let parsed: Result<PlatformConfig, _> =
            serde_json::from_str(r#"{"link_policy": "on_unfollow"}"#);
        assert!(parsed.is_err());
    }
}
