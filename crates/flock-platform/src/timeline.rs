//! Timeline construction.
//!
//! A timeline has two parts: the five most recent placements by followed
//! users, and up to five posts recommended by the configured strategy
//! from everything else. Both parts exclude the requester's own posts
//! and posts the requester already reposted. The concatenation is sorted
//! newest-first before being handed to the agent as prompt-ready views.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;

use flock_agents::Agent;
use flock_types::{PostId, PostView, TimelineStrategy, UserId};

use crate::post::{Placement, Post};
use crate::sampling::{Weighted, weighted_draw};

/// Placements by followed users shown per timeline.
const FOLLOWING_SIZE: usize = 5;
/// Recommended posts per timeline under most strategies.
const RECOMMENDED_SIZE: usize = 5;
/// Recommended posts under the `other_partisan` strategy.
const PARTISAN_SIZE: usize = 3;
/// Candidate pool cap: most recent placements considered by a strategy.
const POOL_CAP: usize = 50;

/// Borrowed platform state needed to build one timeline.
pub(crate) struct TimelineSources<'a> {
    /// All registered agents, in registration order.
    pub users: &'a [Agent],
    /// The full placement stream, in insertion order.
    pub placements: &'a [Placement],
    /// Canonical posts by id.
    pub posts: &'a BTreeMap<PostId, Post>,
    /// Directed follow links.
    pub links: &'a BTreeSet<(UserId, UserId)>,
}

impl TimelineSources<'_> {
    fn agent(&self, id: UserId) -> Option<&Agent> {
        let slot = usize::try_from(id.into_inner().checked_sub(1)?).ok()?;
        self.users.get(slot)
    }

    /// The canonical post behind a placement, if the requester may see it.
    fn visible_post(&self, requester: UserId, placement: &Placement) -> Option<&Post> {
        let post = self.posts.get(&placement.post)?;
        (post.author != requester && !post.reposted_by(requester)).then_some(post)
    }
}

/// Build the timeline for one user.
pub(crate) fn build(
    sources: &TimelineSources<'_>,
    requester: UserId,
    strategy: TimelineStrategy,
    partisan_bias: f64,
    rng: &mut impl Rng,
) -> Vec<PostView> {
    let followed: BTreeSet<UserId> = sources
        .links
        .iter()
        .filter(|(from, _)| *from == requester)
        .map(|(_, to)| *to)
        .collect();

    let following_all: Vec<&Placement> = sources
        .placements
        .iter()
        .filter(|p| followed.contains(&p.user_id) && sources.visible_post(requester, p).is_some())
        .collect();

    // The recommended pool excludes every post that appears among the
    // followed users' placements, shown or not.
    let following_posts: BTreeSet<PostId> = following_all.iter().map(|p| p.post).collect();
    let pool: Vec<&Placement> = sources
        .placements
        .iter()
        .filter(|p| {
            !following_posts.contains(&p.post) && sources.visible_post(requester, p).is_some()
        })
        .collect();

    let following_part = following_all
        .iter()
        .copied()
        .skip(following_all.len().saturating_sub(FOLLOWING_SIZE));
    let recommended = select_recommended(sources, requester, strategy, partisan_bias, pool, rng);

    let mut merged: Vec<&Placement> = following_part.chain(recommended).collect();
    merged.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
    merged
        .into_iter()
        .filter_map(|p| view(sources, p))
        .collect()
}

/// Apply the configured strategy to the candidate pool.
fn select_recommended<'a>(
    sources: &TimelineSources<'a>,
    requester: UserId,
    strategy: TimelineStrategy,
    partisan_bias: f64,
    pool: Vec<&'a Placement>,
    rng: &mut impl Rng,
) -> Vec<&'a Placement> {
    // The random strategy draws over the full pool; the draw primitive
    // already guarantees one pick per underlying post. Everything else
    // works on the most recent 50 placements, deduplicated.
    if strategy == TimelineStrategy::Random {
        let entries = weight_pool(sources, pool, |_| 1.0);
        return weighted_draw(entries, RECOMMENDED_SIZE, rng);
    }

    let pool = dedup_recent(pool);
    match strategy {
        TimelineStrategy::Random => Vec::new(),
        TimelineStrategy::RandomWeighted => {
            let entries = weight_pool(sources, pool, |post| f64::from(post.reposts) + 1.0);
            weighted_draw(entries, RECOMMENDED_SIZE, rng)
        }
        TimelineStrategy::RandomWeightedReversed => {
            let total: f64 = pool
                .iter()
                .filter_map(|p| sources.posts.get(&p.post))
                .map(|post| f64::from(post.reposts))
                .sum();
            let entries = weight_pool(sources, pool, |post| {
                (total + 1.0) - f64::from(post.reposts)
            });
            weighted_draw(entries, RECOMMENDED_SIZE, rng)
        }
        TimelineStrategy::BridgingAttributes => {
            let mut pool = pool;
            pool.sort_by(|a, b| {
                bridging_score(sources, b).total_cmp(&bridging_score(sources, a))
            });
            pool.truncate(RECOMMENDED_SIZE);
            pool
        }
        TimelineStrategy::Chronological => {
            let mut pool = pool;
            pool.sort_by(|a, b| (b.timestamp, b.id).cmp(&(a.timestamp, a.id)));
            pool.truncate(RECOMMENDED_SIZE);
            pool
        }
        TimelineStrategy::OtherPartisan => {
            let own = sources
                .agent(requester)
                .map_or(0.0, flock_agents::Agent::partisanship);
            let entries: Vec<Weighted<&Placement>> = pool
                .into_iter()
                .filter_map(|p| {
                    let post = sources.posts.get(&p.post)?;
                    let author = sources.agent(post.author)?;
                    let distance = (author.partisanship() - own).abs();
                    let weight =
                        (f64::from(post.reposts) + 1.0) * (1.0 + partisan_bias + distance).ln();
                    Some(Weighted {
                        item: p,
                        post: p.post,
                        weight,
                    })
                })
                .collect();
            weighted_draw(entries, PARTISAN_SIZE, rng)
        }
    }
}

/// Cap the pool to the most recent placements and keep one placement per
/// underlying post (first seen in insertion order).
fn dedup_recent(pool: Vec<&Placement>) -> Vec<&Placement> {
    let capped = pool
        .iter()
        .copied()
        .skip(pool.len().saturating_sub(POOL_CAP));

    let mut seen = BTreeSet::new();
    capped.filter(|p| seen.insert(p.post)).collect()
}

/// Attach per-post weights, dropping placements whose post is missing.
fn weight_pool<'a>(
    sources: &TimelineSources<'a>,
    pool: Vec<&'a Placement>,
    weight: impl Fn(&Post) -> f64,
) -> Vec<Weighted<&'a Placement>> {
    pool.into_iter()
        .filter_map(|p| {
            let post = sources.posts.get(&p.post)?;
            Some(Weighted {
                item: p,
                post: p.post,
                weight: weight(post),
            })
        })
        .collect()
}

fn bridging_score(sources: &TimelineSources<'_>, placement: &Placement) -> f64 {
    sources
        .posts
        .get(&placement.post)
        .and_then(|post| post.bridging_score)
        .unwrap_or(0.0)
}

/// Render one placement as a prompt-ready view.
pub(crate) fn view(sources: &TimelineSources<'_>, placement: &Placement) -> Option<PostView> {
    let post = sources.posts.get(&placement.post)?;
    let author_followers = sources.agent(post.author).map_or(0, Agent::followers);
    Some(PostView {
        post_id: post.post_id,
        author_followers,
        reposts: post.reposts,
        content: post.content.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use chrono::{Duration, Utc};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use flock_types::Persona;

    use super::*;

    struct Fixture {
        users: Vec<Agent>,
        placements: Vec<Placement>,
        posts: BTreeMap<PostId, Post>,
        links: BTreeSet<(UserId, UserId)>,
    }

    impl Fixture {
        fn new(user_count: u64) -> Self {
            let users = (1..=user_count)
                .map(|i| {
                    let mut agent = Agent::new(Persona::new(format!("user {i}"), "Democrat", 0.0));
                    agent.assign_identifier(UserId::new(i));
                    agent
                })
                .collect();
            Self {
                users,
                placements: Vec::new(),
                posts: BTreeMap::new(),
                links: BTreeSet::new(),
            }
        }

        fn with_leanings(leanings: &[f64]) -> Self {
            let users = leanings
                .iter()
                .enumerate()
                .map(|(slot, &lean)| {
                    let id = u64::try_from(slot).unwrap_or(0) + 1;
                    let mut agent =
                        Agent::new(Persona::new(format!("user {id}"), "Democrat", lean));
                    agent.assign_identifier(UserId::new(id));
                    agent
                })
                .collect();
            Self {
                users,
                placements: Vec::new(),
                posts: BTreeMap::new(),
                links: BTreeSet::new(),
            }
        }

        fn add_post(&mut self, author: u64, minutes_ago: i64, score: Option<f64>) -> PostId {
            let id = PostId::new(u64::try_from(self.placements.len()).unwrap_or(0).saturating_add(1));
            let timestamp = Utc::now() - Duration::minutes(minutes_ago);
            self.posts.insert(
                id,
                Post::new(
                    id,
                    UserId::new(author),
                    timestamp,
                    format!("post {id}"),
                    score,
                ),
            );
            self.placements.push(Placement {
                id,
                user_id: UserId::new(author),
                timestamp,
                post: id,
            });
            id
        }

        fn sources(&self) -> TimelineSources<'_> {
            TimelineSources {
                users: &self.users,
                placements: &self.placements,
                posts: &self.posts,
                links: &self.links,
            }
        }

        fn build(&self, requester: u64, strategy: TimelineStrategy) -> Vec<PostView> {
            let mut rng = SmallRng::seed_from_u64(5);
            build(
                &self.sources(),
                UserId::new(requester),
                strategy,
                3.0,
                &mut rng,
            )
        }
    }

    #[test]
    fn chronological_returns_five_newest_descending() {
        let mut fx = Fixture::new(2);
        // Six posts by user 2, oldest first.
        for minutes_ago in [60, 50, 40, 30, 20, 10] {
            fx.add_post(2, minutes_ago, None);
        }

        let timeline = fx.build(1, TimelineStrategy::Chronological);
        let ids: Vec<u64> = timeline.iter().map(|v| v.post_id.into_inner()).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2]);
    }

    #[test]
    fn bridging_returns_top_scored_descending() {
        let mut fx = Fixture::new(2);
        for (i, score) in [0.9, 0.1, 0.5, 0.7, 0.3, 0.2].into_iter().enumerate() {
            let minutes_ago = i64::try_from(60_usize.saturating_sub(i)).unwrap_or(0);
            fx.add_post(2, minutes_ago, Some(score));
        }

        let timeline = fx.build(1, TimelineStrategy::BridgingAttributes);
        let ids: Vec<u64> = timeline.iter().map(|v| v.post_id.into_inner()).collect();
        // Post 2 carries the lowest score (0.1) and is dropped.
        assert!(!ids.contains(&2));
        assert_eq!(ids.len(), 5);

        let scores: Vec<f64> = timeline
            .iter()
            .filter_map(|v| fx.posts.get(&v.post_id).and_then(|p| p.bridging_score))
            .collect();
        // With no followed users the merged sort is time-descending, but
        // the selected set is exactly the five highest-scored.
        let mut sorted = scores.clone();
        sorted.sort_by(f64::total_cmp);
        assert!((sorted.first().copied().unwrap_or(0.0) - 0.2).abs() < 1e-9);
        assert!((sorted.last().copied().unwrap_or(0.0) - 0.9).abs() < 1e-9);
    }

    #[test]
    fn own_and_already_reposted_posts_never_shown() {
        let mut fx = Fixture::new(3);
        let own = fx.add_post(1, 30, None);
        let reposted = fx.add_post(2, 20, None);
        let fresh = fx.add_post(3, 10, None);
        if let Some(post) = fx.posts.get_mut(&reposted) {
            post.count_repost(UserId::new(1));
        }
        fx.links.insert((UserId::new(1), UserId::new(2)));
        fx.links.insert((UserId::new(1), UserId::new(3)));

        for strategy in [
            TimelineStrategy::Random,
            TimelineStrategy::RandomWeighted,
            TimelineStrategy::Chronological,
        ] {
            let timeline = fx.build(1, strategy);
            let ids: Vec<PostId> = timeline.iter().map(|v| v.post_id).collect();
            assert!(!ids.contains(&own));
            assert!(!ids.contains(&reposted));
            assert!(ids.contains(&fresh));
        }
    }

    #[test]
    fn timeline_never_exceeds_ten_posts() {
        let mut fx = Fixture::new(3);
        for i in 0_u64..40 {
            fx.add_post(2 + (i % 2), 100 - i64::try_from(i).unwrap_or(0), None);
        }
        fx.links.insert((UserId::new(1), UserId::new(2)));

        for strategy in [
            TimelineStrategy::Random,
            TimelineStrategy::RandomWeighted,
            TimelineStrategy::RandomWeightedReversed,
            TimelineStrategy::Chronological,
            TimelineStrategy::OtherPartisan,
        ] {
            let timeline = fx.build(1, strategy);
            assert!(timeline.len() <= FOLLOWING_SIZE + RECOMMENDED_SIZE);
        }
    }

    #[test]
    fn followed_posts_excluded_from_recommendations() {
        let mut fx = Fixture::new(2);
        let followed_post = fx.add_post(2, 10, None);
        fx.links.insert((UserId::new(1), UserId::new(2)));

        let timeline = fx.build(1, TimelineStrategy::Chronological);
        // The post appears once, via the following part, not twice.
        let occurrences = timeline
            .iter()
            .filter(|v| v.post_id == followed_post)
            .count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn other_partisan_recommends_exactly_three() {
        let mut fx = Fixture::new(3);
        for i in 0_u64..10 {
            fx.add_post(2 + (i % 2), 50 - i64::try_from(i).unwrap_or(0), None);
        }

        // No followed users, so the timeline is the recommended part alone.
        let timeline = fx.build(1, TimelineStrategy::OtherPartisan);
        assert_eq!(timeline.len(), 3);
    }

    #[test]
    fn other_partisan_favors_distant_authors() {
        // The requester and user 2 share a leaning; user 3 sits far away.
        let mut fx = Fixture::with_leanings(&[0.0, 0.0, 4.0]);
        for i in 0_u64..6 {
            fx.add_post(2, 60 - i64::try_from(i).unwrap_or(0), None);
            fx.add_post(3, 30 - i64::try_from(i).unwrap_or(0), None);
        }

        let (mut near, mut distant) = (0_u32, 0_u32);
        for trial in 0_u64..400 {
            let mut rng = SmallRng::seed_from_u64(trial);
            let timeline = build(
                &fx.sources(),
                UserId::new(1),
                TimelineStrategy::OtherPartisan,
                3.0,
                &mut rng,
            );
            for item in &timeline {
                match fx.posts.get(&item.post_id).map(|p| p.author) {
                    Some(author) if author == UserId::new(3) => {
                        distant = distant.saturating_add(1);
                    }
                    Some(_) => near = near.saturating_add(1),
                    None => {}
                }
            }
        }
        // Weights are (reposts + 1) * ln(1 + bias + |distance|), so the
        // distant author's posts carry ln(8) against the near ln(4).
        assert!(distant > near, "distant {distant} vs near {near}");
    }

    #[test]
    fn reversed_weighting_disfavors_heavily_reposted() {
        let mut fx = Fixture::new(2);
        let heavy = fx.add_post(2, 60, None);
        for r in 0_u64..20 {
            if let Some(post) = fx.posts.get_mut(&heavy) {
                post.count_repost(UserId::new(100 + r));
            }
        }
        for i in 0_u64..5 {
            fx.add_post(2, 50 - i64::try_from(i).unwrap_or(0), None);
        }

        // Six candidates for five slots: the heavy post's reversed weight
        // is 1 against 21 for each unshared post, so it should be the
        // one left out most of the time.
        let mut omitted = 0_u32;
        for trial in 0_u64..300 {
            let mut rng = SmallRng::seed_from_u64(trial);
            let timeline = build(
                &fx.sources(),
                UserId::new(1),
                TimelineStrategy::RandomWeightedReversed,
                3.0,
                &mut rng,
            );
            if !timeline.iter().any(|v| v.post_id == heavy) {
                omitted = omitted.saturating_add(1);
            }
        }
        assert!(omitted > 150, "heavy post omitted only {omitted} of 300 draws");
    }

    #[test]
    fn reposted_placement_resolves_to_canonical_post() {
        let mut fx = Fixture::new(3);
        let original = fx.add_post(2, 30, None);
        // User 3 reposts it: new placement, same canonical post.
        let timestamp = Utc::now() - Duration::minutes(5);
        if let Some(post) = fx.posts.get_mut(&original) {
            post.count_repost(UserId::new(3));
        }
        fx.placements.push(Placement {
            id: PostId::new(2),
            user_id: UserId::new(3),
            timestamp,
            post: original,
        });

        let timeline = fx.build(1, TimelineStrategy::Chronological);
        // Deduplicated to a single view of the canonical post.
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.first().map(|v| v.post_id), Some(original));
        assert_eq!(timeline.first().map(|v| v.reposts), Some(1));
    }
}
