//! Pool storage readers.
//!
//! [`PoolStorageReader`] is the only seam between the arithmetic and a live
//! chain. [`RpcPoolReader`] implements it with a JSON-RPC `eth_call` to the
//! pool's `limitOrderData(int24)` view, ABI encoded through `sol!`.
//!
//! Readers own any retry or timeout policy; the accessor calls them once.

use std::future::Future;

use alloy::hex;
use alloy::primitives::aliases::I24;
use alloy::primitives::{Address, U256};
use alloy::sol;
use alloy::sol_types::SolCall;
use eyre::{eyre, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::types::RawLimitOrder;

sol! {
    interface IiZiSwapPool {
        function limitOrderData(int24 point) external view returns (
            uint128 sellingX,
            uint128 earnY,
            uint256 accEarnY,
            uint128 sellingY,
            uint128 earnX,
            uint256 accEarnX
        );
    }
}

/// Reads the raw limit-order words for one point.
pub trait PoolStorageReader {
    fn read_limit_order(&self, point: i32) -> impl Future<Output = Result<RawLimitOrder>> + Send;
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcError>,
}

/// Reads limit orders from a deployed pool over JSON-RPC.
#[derive(Debug, Clone)]
pub struct RpcPoolReader {
    client: Client,
    rpc_url: String,
    pool: Address,
    block: Option<u64>,
}

impl RpcPoolReader {
    /// Reader against the latest block.
    pub fn new(rpc_url: impl Into<String>, pool: Address) -> Self {
        Self {
            client: Client::new(),
            rpc_url: rpc_url.into(),
            pool,
            block: None,
        }
    }

    /// Pins every read to a historical block (requires an archive node).
    pub fn at_block(mut self, block: u64) -> Self {
        self.block = Some(block);
        self
    }

    pub fn pool(&self) -> Address {
        self.pool
    }

    fn block_tag(&self) -> String {
        self.block
            .map_or_else(|| "latest".to_string(), |block| format!("0x{block:x}"))
    }

    async fn eth_call(&self, data: Vec<u8>) -> Result<Vec<u8>> {
        let request = RpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method: "eth_call",
            params: serde_json::json!([
                {
                    "to": format!("{:#x}", self.pool),
                    "data": format!("0x{}", hex::encode(data)),
                },
                self.block_tag(),
            ]),
        };

        let response = self
            .client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| eyre!("eth_call request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(eyre!("eth_call HTTP status: {}", status));
        }

        let rpc: RpcResponse = response
            .json()
            .await
            .map_err(|e| eyre!("failed to decode eth_call response: {}", e))?;

        if let Some(error) = rpc.error {
            return Err(eyre!("eth_call RPC error {}: {}", error.code, error.message));
        }

        let result = rpc.result.ok_or_else(|| eyre!("eth_call missing result"))?;
        hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| eyre!("eth_call returned invalid hex: {}", e))
    }
}

impl PoolStorageReader for RpcPoolReader {
    #[tracing::instrument(skip(self), fields(pool = %self.pool, block = ?self.block))]
    async fn read_limit_order(&self, point: i32) -> Result<RawLimitOrder> {
        let point_i24 =
            I24::try_from(point).map_err(|e| eyre!("point {} does not fit int24: {}", point, e))?;
        let call = IiZiSwapPool::limitOrderDataCall { point: point_i24 };

        let output = self.eth_call(call.abi_encode()).await?;
        if output.is_empty() {
            return Err(eyre!("limitOrderData({}) returned no data", point));
        }

        let decoded = IiZiSwapPool::limitOrderDataCall::abi_decode_returns(&output, true)
            .map_err(|e| eyre!("failed to decode limitOrderData({}): {}", point, e))?;
        tracing::debug!(point, bytes = output.len(), "read limit order");

        Ok(RawLimitOrder {
            selling_x: U256::from(decoded.sellingX),
            acc_earn_x: decoded.accEarnX,
            selling_y: U256::from(decoded.sellingY),
            acc_earn_y: decoded.accEarnY,
            earn_x: U256::from(decoded.earnX),
            earn_y: U256::from(decoded.earnY),
        })
    }
}
