//! The simulation run: setup, the sequential step loop, and persistence.

use std::path::Path;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use flock_agents::{Agent, PromptEngine};
use flock_oracle::llm::LlmBackend;
use flock_oracle::{BridgingScorer, OracleBackendConfig, ScoringConfig, create_backend};
use flock_platform::{Platform, RunContext, RunLog};
use flock_types::UserId;

use crate::config::SimConfig;
use crate::error::SimError;
use crate::news::NewsCatalog;
use crate::personas;

/// Execute one full simulation run.
///
/// Any error escaping the step loop triggers a checkpoint write of the
/// run log before the error is returned.
pub async fn run(config: SimConfig) -> Result<(), SimError> {
    let oracle_config = OracleBackendConfig::from_env()?;
    let scorer = if config.platform.strategy.needs_bridging_scores() {
        Some(BridgingScorer::new(&ScoringConfig::from_env()?))
    } else {
        None
    };
    let prompts = PromptEngine::new()?;
    let news = NewsCatalog::load(&config.news_catalog)?;
    let catalog = personas::load_catalog(&config.persona_catalog)?;

    let mut rng = SmallRng::seed_from_u64(config.platform.seed);
    let population =
        personas::select_population(&catalog, config.population, config.party_fractions, &mut rng)?;
    info!(
        population = population.len(),
        strategy = %config.platform.strategy,
        link_policy = %config.platform.link_policy,
        "starting run"
    );

    let mut platform = Platform::new(config.platform.clone());
    for persona in population {
        platform.register_user(Agent::new(persona));
    }

    let backend = create_backend(&oracle_config);
    if config.platform.link_policy.shows_biography() {
        generate_biographies(&mut platform, &backend, &prompts).await;
    }

    let result = step_loop(
        &config,
        &oracle_config,
        backend,
        &mut platform,
        &prompts,
        scorer.as_ref(),
        &news,
        &mut rng,
    )
    .await;

    let log = platform.run_log(&config.pricing.cost_model());
    if let Err(e) = &result {
        warn!(error = %e, "run aborted, writing checkpoint");
    }
    persist_log(&config.output_path(), &log)?;
    info!(
        cost = %log.predicted_cost,
        input_tokens = log.total_tokens_input,
        output_tokens = log.total_tokens_output,
        cached_tokens = log.total_tokens_cached,
        "run log written"
    );
    result
}

/// Generate a biography for every agent, used by the with-profile link
/// policy. A failed generation leaves that agent without a biography.
async fn generate_biographies(
    platform: &mut Platform,
    backend: &LlmBackend,
    prompts: &PromptEngine,
) {
    let count = platform.users().len();
    info!(count, "generating agent biographies");
    for raw_id in 1..=count {
        let id = UserId::new(u64::try_from(raw_id).unwrap_or(u64::MAX));
        let Some(agent) = platform.user_mut(id) else {
            continue;
        };
        if let Err(e) = agent.generate_biography(backend, prompts).await {
            warn!(user = %id, error = %e, "biography generation failed");
        }
    }
}

/// The strictly sequential step loop. One user acts per step; the oracle
/// HTTP client is replaced every `client_rotation_steps` steps.
#[allow(clippy::too_many_arguments)]
async fn step_loop(
    config: &SimConfig,
    oracle_config: &flock_oracle::OracleBackendConfig,
    mut backend: LlmBackend,
    platform: &mut Platform,
    prompts: &PromptEngine,
    scorer: Option<&BridgingScorer>,
    news: &NewsCatalog,
    rng: &mut SmallRng,
) -> Result<(), SimError> {
    for step in 0..config.steps {
        let Some(user_id) = platform.sample_user() else {
            break;
        };
        let timeline = platform.timeline_for(user_id)?;
        let news_items = news.sample(config.news_per_step, rng);
        let show_info = platform.config().show_info;

        let (action, prompt) = match platform.user_mut(user_id) {
            Some(agent) => {
                agent
                    .perform_action(&backend, prompts, &news_items, &timeline, show_info)
                    .await
            }
            None => continue,
        };
        info!(step, user = %user_id, action = %action.kind, "step decided");

        let ctx = RunContext {
            oracle: &backend,
            prompts,
            scorer,
        };
        platform.apply_action(&ctx, user_id, action, prompt).await;
        platform.snapshot();

        if step > 0 && step.checked_rem(config.client_rotation_steps) == Some(0) {
            backend = create_backend(oracle_config);
            debug!(step, "rotated oracle client");
        }
    }
    Ok(())
}

/// Write the run log, creating the output directory if needed.
fn persist_log(path: &Path, log: &RunLog) -> Result<(), SimError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| SimError::WriteLog {
            path: dir.display().to_string(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(log)?;
    std::fs::write(path, json).map_err(|source| SimError::WriteLog {
        path: path.display().to_string(),
        source,
    })
}
