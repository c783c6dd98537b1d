//! The YAML run configuration.
//!
//! Everything behavioral lives in the configuration file; secrets (API
//! keys and URLs) come from environment variables so the file can be
//! committed alongside results.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;

use flock_oracle::CostModel;
use flock_platform::PlatformConfig;

use crate::error::SimError;

/// Top-level configuration for one simulation run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Label appended to the output file name.
    pub run_label: String,
    /// Directory the run log is written to.
    pub output_dir: PathBuf,
    /// Number of simulation steps.
    pub steps: u64,
    /// Number of agents sampled from the persona catalog.
    pub population: usize,
    /// News items shown to the acting agent each step.
    pub news_per_step: usize,
    /// Steps between oracle HTTP client rotations; 0 disables rotation.
    pub client_rotation_steps: u64,
    /// Path to the news catalog JSON file.
    pub news_catalog: PathBuf,
    /// Path to the persona catalog JSON file.
    pub persona_catalog: PathBuf,
    /// Party mix of the sampled population.
    pub party_fractions: PartyFractions,
    /// Per-million-token pricing for the cost estimate.
    pub pricing: PricingConfig,
    /// Engine options.
    pub platform: PlatformConfig,
}

impl SimConfig {
    /// Load and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, SimError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_yml::from_str(&raw)?)
    }

    /// Where this run's log is written:
    /// `<output_dir>/<policy>_<strategy>_<info|noinfo>_<label>.json`.
    pub fn output_path(&self) -> PathBuf {
        let info = if self.platform.show_info {
            "info"
        } else {
            "noinfo"
        };
        self.output_dir.join(format!(
            "{}_{}_{}_{}.json",
            self.platform.link_policy, self.platform.strategy, info, self.run_label
        ))
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            run_label: "1".to_owned(),
            output_dir: PathBuf::from("results"),
            steps: 10_000,
            population: 500,
            news_per_step: 10,
            client_rotation_steps: 1000,
            news_catalog: PathBuf::from("news.json"),
            persona_catalog: PathBuf::from("personas.json"),
            party_fractions: PartyFractions::default(),
            pricing: PricingConfig::default(),
            platform: PlatformConfig::default(),
        }
    }
}

/// Fractions of the population sampled from each party group.
///
/// Defaults follow 2025 Gallup party identification figures.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PartyFractions {
    /// Fraction sampled from Democrat personas.
    pub democrat: f64,
    /// Fraction sampled from Republican personas.
    pub republican: f64,
    /// Fraction sampled from non-partisan personas.
    pub non_partisan: f64,
}

impl Default for PartyFractions {
    fn default() -> Self {
        Self {
            democrat: 0.45,
            republican: 0.46,
            non_partisan: 0.09,
        }
    }
}

/// Per-million-token dollar rates.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Rate for uncached input tokens.
    pub input_rate: Decimal,
    /// Rate for output tokens.
    pub output_rate: Decimal,
    /// Rate for cached input tokens.
    pub cached_rate: Decimal,
}

impl PricingConfig {
    /// The cost model used for the run-log estimate.
    pub const fn cost_model(&self) -> CostModel {
        CostModel::new(self.input_rate, self.output_rate, self.cached_rate)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        let model = CostModel::default();
        Self {
            input_rate: model.input_rate,
            output_rate: model.output_rate,
            cached_rate: model.cached_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use flock_types::{LinkPolicy, TimelineStrategy};

    use super::*;

    #[test]
    fn minimal_yaml_fills_defaults() {
        let parsed: Result<SimConfig, _> = serde_yml::from_str(
            "steps: 100\nplatform:\n  strategy: other_partisan\n",
        );
        let Ok(config) = parsed else {
            assert!(parsed.is_ok());
            return;
        };
        assert_eq!(config.steps, 100);
        assert_eq!(config.population, 500);
        assert_eq!(config.platform.strategy, TimelineStrategy::OtherPartisan);
        assert_eq!(config.platform.link_policy, LinkPolicy::AlwaysOnRepost);
        assert!((config.party_fractions.republican - 0.46).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_strategy_fails_at_load() {
        let parsed: Result<SimConfig, _> =
            serde_yml::from_str("platform:\n  strategy: freshest_first\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn output_path_encodes_run_options() {
        let config = SimConfig {
            run_label: "3".to_owned(),
            ..SimConfig::default()
        };
        let path = config.output_path();
        assert_eq!(
            path,
            PathBuf::from("results/always-on-repost_random_info_3.json")
        );
    }
}
