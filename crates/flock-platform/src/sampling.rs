//! Weighted draw without replacement.
//!
//! The one stochastic primitive shared by every randomized timeline
//! strategy. Each step performs one weighted draw over the remaining
//! pool, then removes every entry referencing the same underlying post,
//! so a post reposted many times can still be drawn at most once.

use rand::Rng;

use flock_types::PostId;

/// One entry in a draw pool.
#[derive(Debug, Clone, Copy)]
pub struct Weighted<T> {
    /// The drawable item.
    pub item: T,
    /// Underlying post id; a draw removes every entry sharing it.
    pub post: PostId,
    /// Selection weight. Negative weights count as zero.
    pub weight: f64,
}

/// Draw up to `size` items without replacement.
///
/// Returns exactly `min(size, distinct underlying posts)` items. The
/// probability of each step's draw is proportional to the entry's
/// current weight among the remaining entries; when the total remaining
/// weight is not positive, the step falls back to a uniform draw.
pub fn weighted_draw<T: Copy>(
    mut pool: Vec<Weighted<T>>,
    size: usize,
    rng: &mut impl Rng,
) -> Vec<T> {
    let mut picked = Vec::with_capacity(size.min(pool.len()));

    for _ in 0..size {
        if pool.is_empty() {
            break;
        }
        let total: f64 = pool.iter().map(|entry| entry.weight.max(0.0)).sum();
        let chosen = if total > 0.0 {
            pick_weighted(&pool, total, rng)
        } else {
            pick_uniform(&pool, rng)
        };
        let Some(entry) = chosen else { break };
        picked.push(entry.item);
        pool.retain(|other| other.post != entry.post);
    }

    picked
}

/// One draw proportional to weight. `total` must be the positive sum of
/// the clamped weights.
fn pick_weighted<T: Copy>(
    pool: &[Weighted<T>],
    total: f64,
    rng: &mut impl Rng,
) -> Option<Weighted<T>> {
    let mut remaining = rng.random_range(0.0..total);
    for entry in pool {
        let weight = entry.weight.max(0.0);
        if remaining < weight {
            return Some(*entry);
        }
        remaining -= weight;
    }
    // Floating-point accumulation can leave a sliver past the last entry.
    pool.last().copied()
}

/// One uniform draw over a non-empty pool.
fn pick_uniform<T: Copy>(pool: &[Weighted<T>], rng: &mut impl Rng) -> Option<Weighted<T>> {
    if pool.is_empty() {
        return None;
    }
    let index = rng.random_range(0..pool.len());
    pool.get(index).copied()
}
