//! izi-pool: read-only access to limit-order state held in pool storage.
//!
//! The arithmetic in `izi-math` never talks to a chain. Anything that needs
//! live pool data goes through a [`PoolStorageReader`], injected into a
//! [`LimitOrderAccessor`]; tests substitute an in-memory reader.

pub mod accessor;
pub mod error;
pub mod reader;
pub mod types;

pub use accessor::LimitOrderAccessor;
pub use error::PoolError;
pub use reader::{PoolStorageReader, RpcPoolReader};
pub use types::{LimitOrderState, RawLimitOrder};
