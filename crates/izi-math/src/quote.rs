//! Swap quote at a single point: spend token Y, acquire token X.
//!
//! The quote runs in two passes with mixed rounding:
//!
//! 1. estimate: `L = floor(y / √P)`, then `x = floor(L / √P)`: the largest
//!    whole amount of X the Y budget can buy;
//! 2. reprice: `L' = ceil(x · √P)`, then `cost = ceil(L' · √P)`: the Y the
//!    trader actually pays for that whole X.
//!
//! The reprice pass depends only on `x`, so re-running it on a returned
//! quote reproduces `cost_y` exactly. `cost_y` may differ from the desired
//! amount in either direction.
//!
//! The grid variant keeps √P exact at even points. At odd points √P is
//! truncated **up** to the grid precision; a larger √P yields less X in
//! pass 1 and a higher cost in pass 2.

use serde::{Deserialize, Serialize};

use crate::decimal::ExactDecimal;
use crate::error::Result;
use crate::fraction::Fraction;
use crate::liquidity::{
    liquidity_to_x_q96, liquidity_to_y_q96, x_to_liquidity_q96, y_to_liquidity_q96, SqrtPriceQ96,
};
use crate::price::PriceGrid;
use crate::rounding::Rounding;

/// Outcome of a Y → X quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapQuote {
    /// Whole units of token X the trader receives.
    pub acquired_x: ExactDecimal,
    /// Token Y the trader pays.
    pub cost_y: ExactDecimal,
}

fn reprice(acquired_x: &ExactDecimal, sqrt_price: &Fraction) -> ExactDecimal {
    let liquidity = sqrt_price.scale_by(acquired_x).round(Rounding::Up);
    sqrt_price.scale_by(&liquidity).round(Rounding::Up)
}

impl PriceGrid {
    /// Quotes how much X `desired_y` buys at `point`, and its true Y cost.
    ///
    /// # Errors
    /// [`MathError::DivideByZero`](crate::MathError::DivideByZero) if √price
    /// evaluates to zero, which upward truncation of a positive price rules
    /// out.
    pub fn quote_from_desired_y(&self, point: i32, desired_y: &ExactDecimal) -> Result<SwapQuote> {
        let sqrt_price = self.sqrt_price_fraction_at(point, Rounding::Up)?;
        let inverse = sqrt_price.recip()?;
        let liquidity = inverse.scale_by(desired_y).round(Rounding::Down);
        let acquired_x = inverse.scale_by(&liquidity).round(Rounding::Down);
        let cost_y = reprice(&acquired_x, &sqrt_price);
        tracing::debug!(
            point,
            %desired_y,
            %liquidity,
            %acquired_x,
            %cost_y,
            "quoted y -> x at point"
        );
        Ok(SwapQuote { acquired_x, cost_y })
    }

    /// The reprice pass alone: Y cost of buying `acquired_x` at `point`.
    ///
    /// # Errors
    /// Only an arithmetic fault in the √price evaluation, which a grid built
    /// through [`PriceGrid::new`] does not produce.
    pub fn reprice_cost_y(&self, point: i32, acquired_x: &ExactDecimal) -> Result<ExactDecimal> {
        let sqrt_price = self.sqrt_price_fraction_at(point, Rounding::Up)?;
        Ok(reprice(acquired_x, &sqrt_price))
    }
}

/// Y cost of buying `acquired_x` at an on-chain `sqrtPriceX96`.
///
/// `L = ceil(x · sqrtPriceX96 / 2^96)`, `cost = ceil(L · sqrtPriceX96 / 2^96)`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) if the fixed
/// point divisor is zero, which `2^96` never is.
pub fn cost_y_from_x_q96(
    sqrt_price: SqrtPriceQ96,
    acquired_x: &ExactDecimal,
) -> Result<ExactDecimal> {
    let liquidity = x_to_liquidity_q96(acquired_x, sqrt_price, Rounding::Up)?;
    liquidity_to_y_q96(&liquidity, sqrt_price, Rounding::Up)
}

/// [`PriceGrid::quote_from_desired_y`] against an on-chain `sqrtPriceX96`.
///
/// # Errors
/// [`MathError::DivideByZero`](crate::MathError::DivideByZero) when the
/// encoded price is zero.
pub fn quote_from_desired_y_q96(
    sqrt_price: SqrtPriceQ96,
    desired_y: &ExactDecimal,
) -> Result<SwapQuote> {
    let liquidity = y_to_liquidity_q96(desired_y, sqrt_price, Rounding::Down)?;
    let acquired_x = liquidity_to_x_q96(&liquidity, sqrt_price, Rounding::Down)?;
    let cost_y = cost_y_from_x_q96(sqrt_price, &acquired_x)?;
    Ok(SwapQuote { acquired_x, cost_y })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MathConfig;
    use alloy::primitives::U256;

    fn grid() -> PriceGrid {
        MathConfig::default().grid().expect("default grid")
    }

    fn dec(s: &str) -> ExactDecimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn quote_at_origin_is_one_to_one() {
        let quote = grid().quote_from_desired_y(0, &dec("1000000")).unwrap();
        assert_eq!(quote.acquired_x, dec("1000000"));
        assert_eq!(quote.cost_y, dec("1000000"));
    }

    #[test]
    fn quote_at_point_two_traces_both_passes() {
        // √P = 1.0001: L = 999900, x = 999800, L' = 999900, cost = 1000000
        let quote = grid().quote_from_desired_y(2, &dec("1000000")).unwrap();
        assert_eq!(quote.acquired_x, dec("999800"));
        assert_eq!(quote.cost_y, dec("1000000"));
    }

    #[test]
    fn quote_at_negative_even_point_uses_exact_root() {
        // √P = 10000 / 10001: L = 10001, x = 10002, L' = 10001, cost = 10000
        let quote = grid().quote_from_desired_y(-2, &dec("10000")).unwrap();
        assert_eq!(quote.acquired_x, dec("10002"));
        assert_eq!(quote.cost_y, dec("10000"));
        assert_eq!(grid().reprice_cost_y(-2, &dec("10002")).unwrap(), dec("10000"));
    }

    #[test]
    fn reprice_is_idempotent() {
        let grid = grid();
        for (point, desired) in [(0, "1000000"), (1, "12345"), (-37, "999999999"), (501, "42")] {
            let quote = grid.quote_from_desired_y(point, &dec(desired)).unwrap();
            let repriced = grid.reprice_cost_y(point, &quote.acquired_x).unwrap();
            assert_eq!(repriced, quote.cost_y, "point {point}");
        }
    }

    #[test]
    fn zero_budget_buys_nothing() {
        let quote = grid().quote_from_desired_y(10, &ExactDecimal::zero()).unwrap();
        assert_eq!(quote.acquired_x, ExactDecimal::zero());
        assert_eq!(quote.cost_y, ExactDecimal::zero());
    }

    #[test]
    fn q96_cost_at_unit_price() {
        let one = SqrtPriceQ96::new(U256::from(1u64) << 96);
        assert_eq!(cost_y_from_x_q96(one, &dec("777")).unwrap(), dec("777"));
        let quote = quote_from_desired_y_q96(one, &dec("1000000")).unwrap();
        assert_eq!(quote.acquired_x, dec("1000000"));
        assert_eq!(quote.cost_y, dec("1000000"));
    }

    #[test]
    fn q96_cost_rounds_up_twice() {
        // sqrt price 1.5: L = ceil(3 * 1.5) = 5, cost = ceil(5 * 1.5) = 8
        let one_and_half = SqrtPriceQ96::new(U256::from(3u64) << 95);
        assert_eq!(cost_y_from_x_q96(one_and_half, &dec("3")).unwrap(), dec("8"));
    }

    #[test]
    fn q96_quote_reprices_its_own_x() {
        let one_and_half = SqrtPriceQ96::new(U256::from(3u64) << 95);
        // L = floor(100 / 1.5) = 66, x = floor(66 / 1.5) = 44
        let quote = quote_from_desired_y_q96(one_and_half, &dec("100")).unwrap();
        assert_eq!(quote.acquired_x, dec("44"));
        // L' = 66, cost = 99
        assert_eq!(quote.cost_y, dec("99"));
        assert_eq!(cost_y_from_x_q96(one_and_half, &quote.acquired_x).unwrap(), quote.cost_y);
    }
}
