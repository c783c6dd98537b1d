//! The platform: single source of truth for users, posts, and links.
//!
//! All mutators enforce the network invariants: no duplicate or self
//! links, at most one repost per `(user, post)` pair, repost failures
//! leave state untouched, and every applied action produces exactly one
//! action-log entry. Pure state mutators are synchronous; only the
//! operations that consult an oracle (`apply_action` and the gated link
//! policy behind it) are async.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info, warn};

use flock_agents::{Agent, PromptEngine};
use flock_oracle::llm::LlmBackend;
use flock_oracle::{BridgingScorer, CostModel};
use flock_types::{ActionKind, ChosenAction, LinkProspect, PostId, PostView, TokenUsage, UserId};

use crate::config::PlatformConfig;
use crate::error::PlatformError;
use crate::log::{ActionRecord, PlacementEntry, RunLog, UserRecord};
use crate::post::{Placement, Post};
use crate::snapshot::{NetworkSnapshot, UserSnapshot};
use crate::timeline::{self, TimelineSources};

/// Recent author placements shown in a follow-decision prompt.
const PROSPECT_RECENT_POSTS: usize = 5;

/// Shared handles to the external oracles, passed through every step.
pub struct RunContext<'a> {
    /// The decision oracle.
    pub oracle: &'a LlmBackend,
    /// The prompt engine shared by all agents.
    pub prompts: &'a PromptEngine,
    /// The bridging scorer, present only under the bridging strategy.
    pub scorer: Option<&'a BridgingScorer>,
}

/// What a successful repost produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepostReceipt {
    /// Id of the new placement record.
    pub placement: PostId,
    /// The canonical post that was reposted.
    pub post: PostId,
    /// The original author, target of the link policy.
    pub author: UserId,
}

/// The simulation network state and its mutators.
pub struct Platform {
    users: Vec<Agent>,
    placements: Vec<Placement>,
    posts: BTreeMap<PostId, Post>,
    links: BTreeSet<(UserId, UserId)>,
    actions: Vec<ActionRecord>,
    snapshots: Vec<NetworkSnapshot>,
    config: PlatformConfig,
    rng: SmallRng,
}

impl Platform {
    /// Create an empty platform. The RNG is seeded from the
    /// configuration, so runs are deterministic given a fixed oracle.
    pub fn new(config: PlatformConfig) -> Self {
        let rng = SmallRng::seed_from_u64(config.seed);
        Self {
            users: Vec::new(),
            placements: Vec::new(),
            posts: BTreeMap::new(),
            links: BTreeSet::new(),
            actions: Vec::new(),
            snapshots: Vec::new(),
            config,
            rng,
        }
    }

    /// The active configuration.
    pub const fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// All registered users, in registration order.
    pub fn users(&self) -> &[Agent] {
        &self.users
    }

    /// All follow links.
    pub const fn links(&self) -> &BTreeSet<(UserId, UserId)> {
        &self.links
    }

    /// The full placement stream.
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    /// The action log.
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// Per-step snapshots taken so far.
    pub fn snapshots(&self) -> &[NetworkSnapshot] {
        &self.snapshots
    }

    /// Register an agent, assigning the next sequential 1-based id.
    pub fn register_user(&mut self, mut agent: Agent) -> UserId {
        let id = UserId::new(u64::try_from(self.users.len()).unwrap_or(u64::MAX).saturating_add(1));
        agent.assign_identifier(id);
        self.users.push(agent);
        id
    }

    /// Look up a user by id.
    pub fn user(&self, id: UserId) -> Option<&Agent> {
        self.users.get(Self::user_slot(id)?)
    }

    /// Mutable access to a user, used by biography generation at run
    /// start.
    pub fn user_mut(&mut self, id: UserId) -> Option<&mut Agent> {
        let slot = Self::user_slot(id)?;
        self.users.get_mut(slot)
    }

    /// Draw a uniformly random registered user for the next step.
    pub fn sample_user(&mut self) -> Option<UserId> {
        if self.users.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.users.len());
        self.users.get(index).map(Agent::id)
    }

    /// Resolve any post or placement id to the canonical post.
    pub fn post(&self, id: PostId) -> Option<&Post> {
        self.posts.get(&self.resolve(id)?)
    }

    /// Create a follow link `from -> to`.
    ///
    /// Self links and existing links are no-ops returning `Ok(false)`;
    /// an insertion increments the target's follower count exactly once.
    pub fn link_users(&mut self, from: UserId, to: UserId) -> Result<bool, PlatformError> {
        if self.user(from).is_none() {
            return Err(PlatformError::UserNotFound(from));
        }
        if self.user(to).is_none() {
            return Err(PlatformError::UserNotFound(to));
        }
        if from == to || !self.links.insert((from, to)) {
            return Ok(false);
        }
        if let Some(target) = self.user_mut(to) {
            target.gain_follower();
        }
        Ok(true)
    }

    /// Create an original post, returning its id.
    pub fn create_post(
        &mut self,
        author: UserId,
        content: impl Into<String>,
        bridging_score: Option<f64>,
    ) -> Result<PostId, PlatformError> {
        if self.user(author).is_none() {
            return Err(PlatformError::UserNotFound(author));
        }
        let id = self.next_placement_id();
        let timestamp = Utc::now();
        self.posts
            .insert(id, Post::new(id, author, timestamp, content.into(), bridging_score));
        self.placements.push(Placement {
            id,
            user_id: author,
            timestamp,
            post: id,
        });
        Ok(id)
    }

    /// Repost an existing post.
    ///
    /// Fails without mutating any state when the target is missing, is
    /// the user's own post, or was already reposted by the user. The
    /// link-formation policy is applied by [`apply_action`]; calling
    /// `repost` directly only mutates post and placement state.
    ///
    /// [`apply_action`]: Self::apply_action
    pub fn repost(&mut self, user: UserId, target: PostId) -> Result<RepostReceipt, PlatformError> {
        if self.user(user).is_none() {
            return Err(PlatformError::UserNotFound(user));
        }
        let canonical = self
            .resolve(target)
            .ok_or(PlatformError::PostNotFound(target))?;
        let author = {
            let post = self
                .posts
                .get(&canonical)
                .ok_or(PlatformError::PostNotFound(target))?;
            if post.author == user {
                return Err(PlatformError::SelfRepost { user, post: target });
            }
            if post.reposted_by(user) {
                return Err(PlatformError::AlreadyReposted { user, post: target });
            }
            post.author
        };

        if let Some(post) = self.posts.get_mut(&canonical) {
            post.count_repost(user);
        }
        let id = self.next_placement_id();
        self.placements.push(Placement {
            id,
            user_id: user,
            timestamp: Utc::now(),
            post: canonical,
        });
        Ok(RepostReceipt {
            placement: id,
            post: canonical,
            author,
        })
    }

    /// Apply one decided action.
    ///
    /// Dispatches on the action kind; every failure mode is recovered
    /// here and recorded as a failed entry. Exactly one action-log entry
    /// is appended per call, always.
    pub async fn apply_action(
        &mut self,
        ctx: &RunContext<'_>,
        user_id: UserId,
        action: ChosenAction,
        prompt: String,
    ) {
        if self.user(user_id).is_none() {
            warn!(user = %user_id, "action from unknown user");
            self.record_action(user_id, &action, false, prompt);
            return;
        }

        let success = match action.kind {
            ActionKind::Post => self.apply_post(ctx, user_id, &action.content).await,
            ActionKind::Repost => self.apply_repost(ctx, user_id, &action.content).await,
            ActionKind::Noop => true,
            ActionKind::Invalid => {
                warn!(user = %user_id, reason = %action.explanation, "invalid action");
                false
            }
        };
        self.record_action(user_id, &action, success, prompt);
    }

    /// Build the timeline for one user.
    pub fn timeline_for(&mut self, requester: UserId) -> Result<Vec<PostView>, PlatformError> {
        if self.user(requester).is_none() {
            return Err(PlatformError::UserNotFound(requester));
        }
        let sources = TimelineSources {
            users: &self.users,
            placements: &self.placements,
            posts: &self.posts,
            links: &self.links,
        };
        Ok(timeline::build(
            &sources,
            requester,
            self.config.strategy,
            self.config.partisan_bias,
            &mut self.rng,
        ))
    }

    /// Append a point-in-time snapshot of the network.
    pub fn snapshot(&mut self) {
        let users = self
            .users
            .iter()
            .map(|agent| UserSnapshot {
                identifier: agent.id(),
                followers: agent.followers(),
            })
            .collect();
        let connections = self.links.iter().copied().collect();
        let posts_reposts = self
            .posts
            .values()
            .map(|post| (post.post_id, post.reposts))
            .collect();
        self.snapshots.push(NetworkSnapshot {
            users,
            connections,
            posts_reposts,
        });
    }

    /// Assemble the run-log document.
    pub fn run_log(&self, cost: &CostModel) -> RunLog {
        let mut totals = TokenUsage::new();
        for agent in &self.users {
            totals.absorb(*agent.usage());
        }

        let posts = self
            .placements
            .iter()
            .filter_map(|placement| {
                self.posts.get(&placement.post).map(|post| PlacementEntry {
                    post_id: placement.id,
                    user_id: placement.user_id,
                    time: placement.timestamp,
                    post: post.clone(),
                })
            })
            .collect();

        RunLog {
            total_tokens_input: totals.input,
            total_tokens_output: totals.output,
            total_tokens_cached: totals.cached,
            predicted_cost: cost.estimate(&totals),
            users: self.users.iter().map(UserRecord::from_agent).collect(),
            posts,
            raw_posts: self.posts.values().cloned().collect(),
            user_links: self.links.iter().copied().collect(),
            actions: self.actions.clone(),
            network_snapshots: self.snapshots.clone(),
        }
    }

    async fn apply_post(&mut self, ctx: &RunContext<'_>, author: UserId, content: &str) -> bool {
        let bridging_score = if self.config.strategy.needs_bridging_scores() {
            match ctx.scorer {
                Some(scorer) => Some(scorer.score(content).await),
                None => Some(0.0),
            }
        } else {
            None
        };
        match self.create_post(author, content, bridging_score) {
            Ok(id) => {
                debug!(user = %author, post = %id, "post created");
                true
            }
            Err(e) => {
                warn!(user = %author, error = %e, "post rejected");
                false
            }
        }
    }

    async fn apply_repost(&mut self, ctx: &RunContext<'_>, user: UserId, content: &str) -> bool {
        match self.try_repost(ctx, user, content).await {
            Ok(receipt) => {
                debug!(user = %user, post = %receipt.post, "repost applied");
                true
            }
            Err(e) => {
                warn!(user = %user, error = %e, "repost rejected");
                false
            }
        }
    }

    async fn try_repost(
        &mut self,
        ctx: &RunContext<'_>,
        user: UserId,
        content: &str,
    ) -> Result<RepostReceipt, PlatformError> {
        let target = content
            .trim()
            .parse::<u64>()
            .map_err(|source| PlatformError::InvalidPostReference {
                reference: content.to_owned(),
                source,
            })?;
        let receipt = self.repost(user, PostId::new(target))?;
        self.run_link_policy(ctx, user, receipt).await;
        Ok(receipt)
    }

    /// Run the configured link-formation policy after a successful
    /// repost. Never fails: an oracle failure is recovered as "no link"
    /// and the repost stands.
    async fn run_link_policy(&mut self, ctx: &RunContext<'_>, reposter: UserId, receipt: RepostReceipt) {
        if !self.config.link_policy.consults_oracle() {
            if let Ok(true) = self.link_users(reposter, receipt.author) {
                debug!(from = %reposter, to = %receipt.author, "linked on repost");
            }
            return;
        }

        let Some(prospect) = self.link_prospect(receipt) else {
            return;
        };
        let show_info = self.config.show_info;
        let verdict = match self.user_mut(reposter) {
            Some(agent) => {
                agent
                    .decide_to_link(ctx.oracle, ctx.prompts, &prospect, show_info)
                    .await
            }
            None => return,
        };

        match verdict {
            Ok(v) if v.follow => {
                if let Ok(true) = self.link_users(reposter, receipt.author) {
                    info!(
                        from = %reposter,
                        to = %receipt.author,
                        reason = %v.explanation,
                        "follow link formed"
                    );
                }
            }
            Ok(v) => {
                info!(from = %reposter, to = %receipt.author, reason = %v.explanation, "declined to follow");
            }
            Err(e) => {
                warn!(from = %reposter, error = %e, "link decision failed, not linking");
            }
        }
    }

    /// Everything the reposting agent gets to see about the author.
    fn link_prospect(&self, receipt: RepostReceipt) -> Option<LinkProspect> {
        let author = self.user(receipt.author)?;
        let triggering_content = self.posts.get(&receipt.post).map(|p| p.content.clone())?;
        let sources = TimelineSources {
            users: &self.users,
            placements: &self.placements,
            posts: &self.posts,
            links: &self.links,
        };
        let recent_posts = self
            .placements
            .iter()
            .rev()
            .filter(|p| p.user_id == receipt.author)
            .take(PROSPECT_RECENT_POSTS)
            .filter_map(|p| timeline::view(&sources, p))
            .collect();

        Some(LinkProspect {
            user_id: receipt.author,
            followers: self.config.show_info.then(|| author.followers()),
            biography: if self.config.link_policy.shows_biography() {
                author.persona().biography.clone()
            } else {
                None
            },
            triggering_content,
            recent_posts,
        })
    }

    fn record_action(&mut self, user_id: UserId, action: &ChosenAction, success: bool, prompt: String) {
        self.actions.push(ActionRecord {
            user_id,
            action: action.kind,
            content: action.content.clone(),
            success,
            prompt,
        });
    }

    fn next_placement_id(&self) -> PostId {
        PostId::new(
            u64::try_from(self.placements.len())
                .unwrap_or(u64::MAX)
                .saturating_add(1),
        )
    }

    fn user_slot(id: UserId) -> Option<usize> {
        usize::try_from(id.into_inner().checked_sub(1)?).ok()
    }

    fn resolve(&self, id: PostId) -> Option<PostId> {
        let slot = usize::try_from(id.into_inner().checked_sub(1)?).ok()?;
        self.placements.get(slot).map(|placement| placement.post)
    }
}
