//! izi-math: exact integer arithmetic for a point-grid concentrated-liquidity AMM.
//!
//! Converts between liquidity, token X and token Y amounts on a discrete
//! price grid where the price at point `p` is `rate^p`. Every quantity is an
//! [`ExactDecimal`]; no floating point is used anywhere in the computation
//! path, and every division takes an explicit [`Rounding`] direction.
//!
//! ## Rounding convention
//!
//! | Quantity | Direction |
//! |----------|-----------|
//! | Tokens the trader pays | [`Rounding::Up`] |
//! | Tokens the trader receives | [`Rounding::Down`] |
//! | Gross fee | [`Rounding::Up`] |
//! | Protocol-charged share of a fee | [`Rounding::Down`] |

pub mod config;
pub mod decimal;
pub mod error;
pub mod fee;
mod fraction;
pub mod liquidity;
pub mod price;
pub mod quote;
pub mod range;
pub mod rounding;

pub use config::MathConfig;
pub use decimal::ExactDecimal;
pub use error::{MathError, Result};
pub use fee::{ChargePercent, FeeSplit, FeeTier};
pub use liquidity::SqrtPriceQ96;
pub use price::{GridPrice, PriceGrid};
pub use quote::SwapQuote;
pub use range::Range;
pub use rounding::Rounding;
