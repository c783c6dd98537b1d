//! Token cost estimation for the run log.
//!
//! Computes the predicted dollar cost of a run from accumulated token
//! counts using configurable per-million-token rates. All monetary
//! calculations use [`rust_decimal::Decimal`] for financial precision --
//! no floating-point arithmetic.

use rust_decimal::Decimal;

use flock_types::TokenUsage;

/// One million, used as the denominator for per-million-token pricing.
const ONE_MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Per-million-token pricing for one model.
///
/// Cached prompt tokens are billed at their own (discounted) rate;
/// the input rate applies only to the uncached remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostModel {
    /// Dollars per million uncached input tokens.
    pub input_rate: Decimal,
    /// Dollars per million output tokens.
    pub output_rate: Decimal,
    /// Dollars per million cached input tokens.
    pub cached_rate: Decimal,
}

impl CostModel {
    /// Create a cost model from explicit rates.
    pub const fn new(input_rate: Decimal, output_rate: Decimal, cached_rate: Decimal) -> Self {
        Self {
            input_rate,
            output_rate,
            cached_rate,
        }
    }

    /// Estimate the dollar cost of the given accumulated usage.
    ///
    /// `cost = output/1M * output_rate + (input - cached)/1M * input_rate
    ///       + cached/1M * cached_rate`
    ///
    /// Decimal division/multiplication cannot overflow for realistic
    /// token counts; any degenerate overflow degrades to zero rather
    /// than failing the log write.
    pub fn estimate(&self, usage: &TokenUsage) -> Decimal {
        let uncached_input = Decimal::from(usage.input.saturating_sub(usage.cached));
        let output = Decimal::from(usage.output);
        let cached = Decimal::from(usage.cached);

        let per_million = |tokens: Decimal, rate: Decimal| {
            tokens
                .checked_div(ONE_MILLION)
                .unwrap_or(Decimal::ZERO)
                .checked_mul(rate)
                .unwrap_or(Decimal::ZERO)
        };

        let input_cost = per_million(uncached_input, self.input_rate);
        let output_cost = per_million(output, self.output_rate);
        let cached_cost = per_million(cached, self.cached_rate);

        input_cost
            .checked_add(output_cost)
            .and_then(|c| c.checked_add(cached_cost))
            .unwrap_or(Decimal::ZERO)
    }
}

impl Default for CostModel {
    /// Default rates for the reference model: $0.15 / $0.60 / $0.075
    /// per million input / output / cached-input tokens.
    fn default() -> Self {
        Self {
            input_rate: Decimal::new(15, 2),
            output_rate: Decimal::new(60, 2),
            cached_rate: Decimal::new(75, 3),
        }
    }
}
