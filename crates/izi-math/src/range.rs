//! Token amounts across a span of grid points.
//!
//! A [`Range`] holds liquidity constant over the half-open interval
//! `[pl, pr)`. The token amount of a range is the sum of the per-point
//! amounts, accumulated as an exact fraction and rounded once at the end;
//! rounding every point would compound the error over thousands of points.
//!
//! At even points the square-root price is rational and enters the sum
//! exactly. At odd points it is irrational and is truncated to the grid
//! precision in the direction that keeps the sum on the requested side of
//! the true value:
//!
//! | Token | per-point term | truncated |
//! |-------|----------------|-----------|
//! | X = L / √P | `sqrt(1 / P)` | with `rounding` |
//! | Y = L · √P | `sqrt(P)` | with `rounding` |
//!
//! No term divides by a truncated root, so a coarse precision only widens
//! the gap between the two directions.

use serde::{Deserialize, Serialize};

use crate::decimal::ExactDecimal;
use crate::error::{MathError, Result};
use crate::fraction::Fraction;
use crate::price::PriceGrid;
use crate::rounding::Rounding;

/// Liquidity assumed constant over `[pl, pr)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub liquidity: ExactDecimal,
    pub pl: i32,
    pub pr: i32,
}

impl Range {
    pub fn new(liquidity: ExactDecimal, pl: i32, pr: i32) -> Self {
        Self { liquidity, pl, pr }
    }
}

fn check_range(pl: i32, pr: i32) -> Result<()> {
    if pr < pl {
        return Err(MathError::InvalidRange { pl, pr });
    }
    Ok(())
}

impl PriceGrid {
    /// Token X needed to cover `liquidity` over `[pl, pr)`.
    ///
    /// # Errors
    /// [`MathError::InvalidRange`] when `pr < pl`.
    pub fn token_x_in_range(
        &self,
        liquidity: &ExactDecimal,
        pl: i32,
        pr: i32,
        rounding: Rounding,
    ) -> Result<ExactDecimal> {
        check_range(pl, pr)?;
        let scale = self.precision();
        let mut price = self.price_at(pl);
        let mut inverse_sqrt_sum = Fraction::zero();
        for _ in pl..pr {
            inverse_sqrt_sum = &inverse_sqrt_sum + &price.inverse_sqrt_fraction(scale, rounding)?;
            price.step(self.rate());
        }
        let amount = inverse_sqrt_sum.scale_by(liquidity);
        tracing::trace!(pl, pr, ?rounding, %amount, "token x over range before rounding");
        Ok(amount.round(rounding))
    }

    /// Token Y needed to cover `liquidity` over `[pl, pr)`.
    ///
    /// # Errors
    /// [`MathError::InvalidRange`] when `pr < pl`.
    pub fn token_y_in_range(
        &self,
        liquidity: &ExactDecimal,
        pl: i32,
        pr: i32,
        rounding: Rounding,
    ) -> Result<ExactDecimal> {
        check_range(pl, pr)?;
        let scale = self.precision();
        let mut price = self.price_at(pl);
        let mut sqrt_sum = Fraction::zero();
        for _ in pl..pr {
            sqrt_sum = &sqrt_sum + &price.sqrt_fraction(scale, rounding)?;
            price.step(self.rate());
        }
        let amount = sqrt_sum.scale_by(liquidity);
        tracing::trace!(pl, pr, ?rounding, %amount, "token y over range before rounding");
        Ok(amount.round(rounding))
    }

    /// [`Self::token_x_in_range`] for each range, in input order.
    ///
    /// Lazy: each range is evaluated when the iterator reaches it.
    pub fn batch_token_x_in_ranges<'a>(
        &'a self,
        ranges: &'a [Range],
        rounding: Rounding,
    ) -> impl Iterator<Item = Result<ExactDecimal>> + 'a {
        tracing::debug!(ranges = ranges.len(), ?rounding, "batch token x");
        ranges
            .iter()
            .map(move |range| self.token_x_in_range(&range.liquidity, range.pl, range.pr, rounding))
    }

    /// [`Self::token_y_in_range`] for each range, in input order.
    pub fn batch_token_y_in_ranges<'a>(
        &'a self,
        ranges: &'a [Range],
        rounding: Rounding,
    ) -> impl Iterator<Item = Result<ExactDecimal>> + 'a {
        tracing::debug!(ranges = ranges.len(), ?rounding, "batch token y");
        ranges
            .iter()
            .map(move |range| self.token_y_in_range(&range.liquidity, range.pl, range.pr, rounding))
    }
}
