//! Token usage accounting.
//!
//! Every oracle call reports how many tokens it consumed; the counters
//! accumulate per user for the lifetime of a run and feed the cost
//! estimate in the run log. Accumulation saturates rather than wrapping.

use serde::{Deserialize, Serialize};

/// Monotonically increasing token counters for one user (or one call).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Prompt tokens sent to the oracle.
    pub input: u64,
    /// Completion tokens produced by the oracle.
    pub output: u64,
    /// Prompt tokens served from the provider's cache (subset of `input`).
    pub cached: u64,
}

impl TokenUsage {
    /// Zeroed counters.
    pub const fn new() -> Self {
        Self {
            input: 0,
            output: 0,
            cached: 0,
        }
    }

    /// Usage of a single call.
    pub const fn of_call(input: u64, output: u64, cached: u64) -> Self {
        Self {
            input,
            output,
            cached,
        }
    }

    /// Fold another usage record into this one (saturating).
    pub const fn absorb(&mut self, other: Self) {
        self.input = self.input.saturating_add(other.input);
        self.output = self.output.saturating_add(other.output);
        self.cached = self.cached.saturating_add(other.cached);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_accumulates() {
        let mut total = TokenUsage::new();
        total.absorb(TokenUsage::of_call(100, 20, 10));
        total.absorb(TokenUsage::of_call(50, 5, 0));
        assert_eq!(total.input, 150);
        assert_eq!(total.output, 25);
        assert_eq!(total.cached, 10);
    }

    #[test]
    fn absorb_saturates_instead_of_wrapping() {
        let mut total = TokenUsage::of_call(u64::MAX, 0, 0);
        total.absorb(TokenUsage::of_call(1, 0, 0));
        assert_eq!(total.input, u64::MAX);
    }
}
