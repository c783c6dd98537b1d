//! The agent: one simulated user bridged to the decision oracle.
//!
//! An [`Agent`] owns a persona descriptor, a follower count, and token
//! usage counters. It exposes the two oracle-backed decisions the
//! platform needs: [`perform_action`] (what to do this step) and
//! [`decide_to_link`] (whether to follow a user after reposting them).
//! Oracle failures during `perform_action` never propagate -- the agent
//! answers with the invalid-action sentinel so the platform's action log
//! still receives exactly one entry for the step.
//!
//! [`perform_action`]: Agent::perform_action
//! [`decide_to_link`]: Agent::decide_to_link

use tracing::warn;

use flock_oracle::llm::{LlmBackend, RenderedPrompt};
use flock_oracle::{parse_action, parse_biography, parse_verdict};
use flock_types::{ChosenAction, LinkProspect, LinkVerdict, NewsItem, Persona, PostView, TokenUsage, UserId};

use crate::error::AgentError;
use crate::prompts::PromptEngine;

/// One simulated user.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Platform-assigned identifier (0 until registration).
    id: UserId,
    /// Opaque persona descriptor.
    persona: Persona,
    /// Follower count, mutated only by the platform's link routine.
    followers: u32,
    /// Accumulated oracle token usage.
    usage: TokenUsage,
}

impl Agent {
    /// Create an unregistered agent from a persona.
    pub const fn new(persona: Persona) -> Self {
        Self {
            id: UserId::new(0),
            persona,
            followers: 0,
            usage: TokenUsage::new(),
        }
    }

    /// The platform-assigned identifier.
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Set the identifier at registration. Called once by the platform.
    pub const fn assign_identifier(&mut self, id: UserId) {
        self.id = id;
    }

    /// The persona descriptor.
    pub const fn persona(&self) -> &Persona {
        &self.persona
    }

    /// The partisanship score read by the `other_partisan` strategy.
    pub const fn partisanship(&self) -> f64 {
        self.persona.partisanship
    }

    /// Current follower count.
    pub const fn followers(&self) -> u32 {
        self.followers
    }

    /// Record one new follower. Called only by the platform's link routine.
    pub const fn gain_follower(&mut self) {
        self.followers = self.followers.saturating_add(1);
    }

    /// Accumulated token usage.
    pub const fn usage(&self) -> &TokenUsage {
        &self.usage
    }

    /// Ask the oracle which action to take this step.
    ///
    /// Returns the decided action together with the user-facing prompt
    /// (logged with the action). Never fails: oracle or parse errors
    /// yield the invalid-action sentinel carrying the error text.
    pub async fn perform_action(
        &mut self,
        oracle: &LlmBackend,
        prompts: &PromptEngine,
        news: &[NewsItem],
        timeline: &[PostView],
        show_info: bool,
    ) -> (ChosenAction, String) {
        let system = match prompts.render_system(&self.persona.description) {
            Ok(text) => text,
            Err(e) => return (ChosenAction::invalid(e.to_string()), String::new()),
        };
        let user = match prompts.render_action(timeline, news, show_info) {
            Ok(text) => text,
            Err(e) => return (ChosenAction::invalid(e.to_string()), String::new()),
        };

        let prompt = RenderedPrompt { system, user };
        match oracle.complete(&prompt).await {
            Ok(reply) => {
                self.usage.absorb(reply.usage);
                match parse_action(&reply.text) {
                    Ok(action) => (action, prompt.user),
                    Err(e) => {
                        warn!(user = %self.id, error = %e, "action response unparseable");
                        (ChosenAction::invalid(e.to_string()), prompt.user)
                    }
                }
            }
            Err(e) => {
                warn!(user = %self.id, error = %e, "oracle call failed");
                (ChosenAction::invalid(e.to_string()), prompt.user)
            }
        }
    }

    /// Ask the oracle whether to follow the prospect user.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if the prompt fails to render or the oracle
    /// call or its parsing fails; the caller decides how to recover
    /// (the platform treats a failure as "no link").
    pub async fn decide_to_link(
        &mut self,
        oracle: &LlmBackend,
        prompts: &PromptEngine,
        prospect: &LinkProspect,
        show_info: bool,
    ) -> Result<LinkVerdict, AgentError> {
        let prompt = RenderedPrompt {
            system: prompts.render_system(&self.persona.description)?,
            user: prompts.render_link(prospect, show_info)?,
        };

        let reply = oracle.complete(&prompt).await.map_err(AgentError::from)?;
        self.usage.absorb(reply.usage);

        Ok(parse_verdict(&reply.text)?)
    }

    /// Generate and store a short biography for this agent's persona.
    ///
    /// Used at run start when the link policy shows profiles. A no-op if
    /// the persona already carries a biography.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] on render, oracle, or parse failure.
    pub async fn generate_biography(
        &mut self,
        oracle: &LlmBackend,
        prompts: &PromptEngine,
    ) -> Result<(), AgentError> {
        if self.persona.biography.is_some() {
            return Ok(());
        }

        let prompt = RenderedPrompt {
            system: prompts.render_bio(&self.persona.description)?,
            user: "Write the biography now.".to_owned(),
        };

        let reply = oracle.complete(&prompt).await.map_err(AgentError::from)?;
        self.usage.absorb(reply.usage);

        self.persona.biography = Some(parse_biography(&reply.text)?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use flock_oracle::config::{BackendType, OracleBackendConfig};
    use flock_oracle::create_backend;
    use flock_types::ActionKind;

    use super::*;

    fn test_agent() -> Agent {
        Agent::new(Persona::new(
            "A softspoken librarian who reads everything.",
            "Non-partisan",
            0.1,
        ))
    }

    /// A backend pointing at a closed port; every call fails fast.
    fn unreachable_backend() -> LlmBackend {
        create_backend(&OracleBackendConfig {
            backend_type: BackendType::OpenAi,
            api_url: "http://127.0.0.1:9".to_owned(),
            api_key: "unused".to_owned(),
            model: "unused".to_owned(),
        })
    }

    #[test]
    fn registration_assigns_identifier() {
        let mut agent = test_agent();
        assert_eq!(agent.id(), UserId::new(0));
        agent.assign_identifier(UserId::new(4));
        assert_eq!(agent.id(), UserId::new(4));
    }

    #[test]
    fn followers_start_at_zero_and_increment() {
        let mut agent = test_agent();
        assert_eq!(agent.followers(), 0);
        agent.gain_follower();
        agent.gain_follower();
        assert_eq!(agent.followers(), 2);
    }

    #[tokio::test]
    async fn oracle_failure_yields_invalid_sentinel() {
        let mut agent = test_agent();
        let backend = unreachable_backend();
        let Ok(prompts) = PromptEngine::new() else {
            return;
        };

        let (action, prompt) = agent
            .perform_action(&backend, &prompts, &[], &[], true)
            .await;
        assert_eq!(action.kind, ActionKind::Invalid);
        assert!(!action.explanation.is_empty());
        // The prompt is still produced for the action log.
        assert!(prompt.contains("You are presented with the following options"));
    }

    #[tokio::test]
    async fn link_decision_failure_propagates() {
        let mut agent = test_agent();
        let backend = unreachable_backend();
        let Ok(prompts) = PromptEngine::new() else {
            return;
        };
        let prospect = LinkProspect {
            user_id: UserId::new(2),
            followers: Some(5),
            biography: None,
            triggering_content: "some post".to_owned(),
            recent_posts: Vec::new(),
        };

        let verdict = agent
            .decide_to_link(&backend, &prompts, &prospect, true)
            .await;
        assert!(verdict.is_err());
    }
}
