//! Limit-order records as stored on-chain and as exposed to callers.

use alloy::primitives::U256;
use izi_math::ExactDecimal;
use serde::{Deserialize, Serialize};

/// The six storage words kept per point for the limit-order book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawLimitOrder {
    /// Token X still offered at this point.
    pub selling_x: U256,
    /// Accumulated Y earned by X sellers.
    pub acc_earn_x: U256,
    /// Token Y still offered at this point.
    pub selling_y: U256,
    /// Accumulated X earned by Y sellers.
    pub acc_earn_y: U256,
    /// X earned and not yet claimed.
    pub earn_x: U256,
    /// Y earned and not yet claimed.
    pub earn_y: U256,
}

/// Immutable snapshot of one point's limit-order book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitOrderState {
    pub selling_x: ExactDecimal,
    pub acc_earn_x: ExactDecimal,
    pub selling_y: ExactDecimal,
    pub acc_earn_y: ExactDecimal,
    pub earn_x: ExactDecimal,
    pub earn_y: ExactDecimal,
}

impl From<RawLimitOrder> for LimitOrderState {
    fn from(raw: RawLimitOrder) -> Self {
        Self {
            selling_x: raw.selling_x.into(),
            acc_earn_x: raw.acc_earn_x.into(),
            selling_y: raw.selling_y.into(),
            acc_earn_y: raw.acc_earn_y.into(),
            earn_x: raw.earn_x.into(),
            earn_y: raw.earn_y.into(),
        }
    }
}
