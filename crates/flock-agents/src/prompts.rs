//! Prompt template rendering via `minijinja`.
//!
//! Templates are embedded at compile time (the prompt wording is part of
//! the experimental design, so it versions with the code). The engine
//! renders four prompts: the persona system message, the per-step action
//! prompt, the follow-decision prompt, and the one-off biography prompt.

use minijinja::Environment;
use serde::Serialize;

use flock_types::{LinkProspect, NewsItem, PostView};

use crate::error::AgentError;

/// Manages prompt template loading and rendering.
///
/// Wraps a `minijinja` [`Environment`] with all agent prompt templates
/// pre-loaded. One engine is shared by every agent in a run.
pub struct PromptEngine {
    env: Environment<'static>,
}

/// Context for the persona system message and the biography prompt.
#[derive(Serialize)]
struct PersonaContext<'a> {
    /// Free-text persona description.
    persona: &'a str,
}

/// Context for the per-step action prompt.
#[derive(Serialize)]
struct ActionContext<'a> {
    /// The posts shown for the repost option.
    timeline: &'a [PostView],
    /// The news items shown for the post option.
    news: &'a [NewsItem],
    /// Whether follower and repost counts are visible.
    show_info: bool,
}

/// Context for the follow-decision prompt.
#[derive(Serialize)]
struct LinkContext<'a> {
    /// Everything visible about the candidate user.
    prospect: &'a LinkProspect,
    /// Whether follower and repost counts are visible on posts.
    show_info: bool,
}

impl PromptEngine {
    /// Create a prompt engine with all templates registered.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Template`] if a template fails to compile.
    pub fn new() -> Result<Self, AgentError> {
        let mut env = Environment::new();

        let add = |env: &mut Environment<'static>, name: &'static str, source: &'static str| {
            env.add_template(name, source)
                .map_err(|e| AgentError::Template(format!("failed to add {name} template: {e}")))
        };

        add(&mut env, "system", include_str!("../templates/system.j2"))?;
        add(&mut env, "post", include_str!("../templates/post.j2"))?;
        add(&mut env, "action", include_str!("../templates/action.j2"))?;
        add(&mut env, "link", include_str!("../templates/link.j2"))?;
        add(&mut env, "bio", include_str!("../templates/bio.j2"))?;

        Ok(Self { env })
    }

    /// Render the persona system message.
    pub fn render_system(&self, persona_description: &str) -> Result<String, AgentError> {
        self.render(
            "system",
            &PersonaContext {
                persona: persona_description,
            },
        )
    }

    /// Render the per-step action prompt.
    pub fn render_action(
        &self,
        timeline: &[PostView],
        news: &[NewsItem],
        show_info: bool,
    ) -> Result<String, AgentError> {
        self.render(
            "action",
            &ActionContext {
                timeline,
                news,
                show_info,
            },
        )
    }

    /// Render the follow-decision prompt.
    pub fn render_link(
        &self,
        prospect: &LinkProspect,
        show_info: bool,
    ) -> Result<String, AgentError> {
        self.render("link", &LinkContext { prospect, show_info })
    }

    /// Render the biography-generation prompt.
    pub fn render_bio(&self, persona_description: &str) -> Result<String, AgentError> {
        self.render(
            "bio",
            &PersonaContext {
                persona: persona_description,
            },
        )
    }

    /// Render a named template with the given context.
    fn render<S: Serialize>(&self, name: &str, context: &S) -> Result<String, AgentError> {
        self.env
            .get_template(name)
            .map_err(|e| AgentError::Template(format!("missing {name} template: {e}")))?
            .render(context)
            .map_err(|e| AgentError::Template(format!("{name} render failed: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use flock_types::{PostId, UserId};

    use super::*;

    fn engine() -> PromptEngine {
        PromptEngine::new().unwrap()
    }

    fn sample_timeline() -> Vec<PostView> {
        vec![
            PostView {
                post_id: PostId::new(3),
                author_followers: 12,
                reposts: 4,
                content: "Healthcare should be a right, full stop.".to_owned(),
            },
            PostView {
                post_id: PostId::new(9),
                author_followers: 0,
                reposts: 0,
                content: "Anyone else watching the debate tonight?".to_owned(),
            },
        ]
    }

    fn sample_news() -> Vec<NewsItem> {
        vec![NewsItem {
            headline: "Senate passes infrastructure bill".to_owned(),
            category: "POLITICS".to_owned(),
            short_description: "The bill passed after months of negotiation.".to_owned(),
        }]
    }

    #[test]
    fn system_message_embeds_persona() {
        let rendered = engine().render_system("A nurse from Texas who loves hiking.");
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(text.contains("A nurse from Texas"));
        assert!(text.contains("social media platform"));
    }

    #[test]
    fn action_prompt_lists_timeline_and_news() {
        let rendered = engine().render_action(&sample_timeline(), &sample_news(), true);
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(text.contains("Post ID: 3"));
        assert!(text.contains("user with 12 followers"));
        assert!(text.contains("Reposts: 4"));
        assert!(text.contains("Senate passes infrastructure bill"));
        assert!(text.contains("ID: 1"));
    }

    #[test]
    fn action_prompt_hides_counts_without_show_info() {
        let rendered = engine().render_action(&sample_timeline(), &sample_news(), false);
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(text.contains("Post ID: 3"));
        assert!(!text.contains("followers"));
        assert!(!text.contains("Reposts:"));
    }

    #[test]
    fn link_prompt_with_profile_shows_bio_and_followers() {
        let prospect = LinkProspect {
            user_id: UserId::new(7),
            followers: Some(33),
            biography: Some("dog mom, yells at the news".to_owned()),
            triggering_content: "Hot take about tariffs".to_owned(),
            recent_posts: sample_timeline(),
        };
        let rendered = engine().render_link(&prospect, true);
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(text.contains("User ID: 7"));
        assert!(text.contains("Followers: 33"));
        assert!(text.contains("Bio: dog mom"));
        assert!(text.contains("Hot take about tariffs"));
        assert!(text.contains("\"choice\""));
    }

    #[test]
    fn link_prompt_posts_only_omits_bio_and_followers() {
        let prospect = LinkProspect {
            user_id: UserId::new(7),
            followers: None,
            biography: None,
            triggering_content: "Hot take about tariffs".to_owned(),
            recent_posts: Vec::new(),
        };
        let rendered = engine().render_link(&prospect, false);
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(!text.contains("Followers:"));
        assert!(!text.contains("Bio:"));
    }

    #[test]
    fn bio_prompt_requests_json() {
        let rendered = engine().render_bio("A union electrician from Pittsburgh.");
        let Ok(text) = rendered else {
            assert!(rendered.is_ok());
            return;
        };
        assert!(text.contains("140 characters"));
        assert!(text.contains("\"biography\""));
    }
}
