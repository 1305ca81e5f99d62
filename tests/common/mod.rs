//! Shared test doubles for the pool storage reader and grid helpers.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use alloy::primitives::U256;
use izi_math::{ExactDecimal, MathConfig, PriceGrid};
use izi_pool::{PoolStorageReader, RawLimitOrder};

/// Price grid with the protocol defaults (rate 1.0001).
pub fn default_grid() -> PriceGrid {
    MathConfig::default()
        .grid()
        .expect("default grid should always build")
}

pub fn dec(value: &str) -> ExactDecimal {
    value.parse().expect("valid decimal literal")
}

/// In-memory pool storage. Points without an entry fail like a reverted call.
#[derive(Default)]
pub struct FakeReader {
    orders: HashMap<i32, RawLimitOrder>,
    log: Mutex<Vec<i32>>,
}

impl FakeReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_order(mut self, point: i32, raw: RawLimitOrder) -> Self {
        self.orders.insert(point, raw);
        self
    }

    /// Points read so far, in call order.
    pub fn reads(&self) -> Vec<i32> {
        self.log.lock().expect("read log poisoned").clone()
    }
}

impl PoolStorageReader for FakeReader {
    async fn read_limit_order(&self, point: i32) -> eyre::Result<RawLimitOrder> {
        self.log.lock().expect("read log poisoned").push(point);
        self.orders
            .get(&point)
            .copied()
            .ok_or_else(|| eyre::eyre!("execution reverted at point {}", point))
    }
}

/// Reader whose backend is unreachable.
pub struct UnreachableReader;

impl PoolStorageReader for UnreachableReader {
    async fn read_limit_order(&self, _point: i32) -> eyre::Result<RawLimitOrder> {
        Err(eyre::eyre!("connection refused"))
    }
}

/// Raw order with every word set from a small integer.
pub fn sample_order(selling_x: u64, selling_y: u64) -> RawLimitOrder {
    RawLimitOrder {
        selling_x: U256::from(selling_x),
        acc_earn_x: U256::from(selling_x / 2),
        selling_y: U256::from(selling_y),
        acc_earn_y: U256::from(selling_y / 2),
        earn_x: U256::from(1u64),
        earn_y: U256::from(2u64),
    }
}
