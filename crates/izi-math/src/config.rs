//! Protocol constants and the configurable price-grid parameters.

use serde::{Deserialize, Serialize};

use crate::decimal::ExactDecimal;
use crate::error::Result;
use crate::price::PriceGrid;

/// Fee rate denominator: fee tiers are expressed in parts per million.
pub const FEE_DENOMINATOR_PPM: u32 = 1_000_000;

/// Numerator of the fixed fee markup used by
/// [`gross_fee_from_gross_trade_amount`](crate::fee::gross_fee_from_gross_trade_amount).
pub const GROSS_FEE_NUMERATOR: u32 = 3;

/// Net share of a gross trade amount (`997 / 1000`).
pub const GROSS_FEE_NET_RATIO: u32 = 997;

/// Q96 fixed-point resolution in bits.
pub const Q96_RESOLUTION: u32 = 96;

/// Default per-point price rate: each point is one basis point apart.
pub const DEFAULT_RATE_MANTISSA: u64 = 10_001;
pub const DEFAULT_RATE_SCALE: u32 = 4;

/// Decimal places kept when truncating irrational square-root prices.
pub const DEFAULT_PRECISION: u32 = 40;

/// Price-grid configuration.
///
/// Loaded from JSON by the CLI (`--config`); every field is optional and
/// falls back to the protocol default.
///
/// ```json
/// { "rate": "1.0001", "precision": 40 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MathConfig {
    /// Price multiplier between two adjacent points.
    pub rate: ExactDecimal,
    /// Decimal places for truncated square-root prices.
    pub precision: u32,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            rate: ExactDecimal::new(DEFAULT_RATE_MANTISSA, DEFAULT_RATE_SCALE),
            precision: DEFAULT_PRECISION,
        }
    }
}

impl MathConfig {
    /// Builds the validated price grid.
    ///
    /// # Errors
    /// [`MathError::InvalidRate`](crate::MathError::InvalidRate) if the rate
    /// is not positive.
    pub fn grid(&self) -> Result<PriceGrid> {
        PriceGrid::new(self.rate.clone(), self.precision)
    }
}
