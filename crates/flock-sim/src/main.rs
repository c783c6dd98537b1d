//! Flock simulation runner.
//!
//! Loads the YAML run configuration (path given as the first argument,
//! `flock.yaml` by default), builds the platform and its population, and
//! drives the sequential step loop. Oracle credentials come from the
//! environment: `ORACLE_BACKEND`, `ORACLE_API_URL`, `ORACLE_API_KEY`,
//! `ORACLE_MODEL`, and `SCORING_API_KEY` under the bridging strategy.

use std::path::Path;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod news;
mod personas;
mod run;

use config::SimConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "flock.yaml".to_owned());
    let config = SimConfig::load(Path::new(&path))
        .with_context(|| format!("loading run configuration from {path}"))?;

    run::run(config).await.context("simulation run failed")?;
    Ok(())
}
