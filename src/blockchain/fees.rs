// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gas price strategies for EVM transfers.
//!
//! The executor asks a [`FeeEstimator`] for a legacy gas price and does not
//! care where it comes from:
//!
//! - `Fixed` - a constant configured at startup
//! - `Oracle` - fetched from a third-party gas station over HTTPS
//! - `Rpc` - `eth_gasPrice` from the target network's node

use std::time::Duration;

use serde_json::Value;

use super::client::{ChainClientError, EvmRpc};

const WEI_PER_GWEI: f64 = 1_000_000_000.0;

/// Strategy for pricing gas on EVM networks.
#[derive(Debug, Clone)]
pub enum FeeEstimator {
    Fixed {
        gas_price_wei: u128,
    },
    Oracle {
        client: reqwest::Client,
        url: String,
        /// JSON field holding the price in gwei
        field: String,
    },
    Rpc,
}

impl FeeEstimator {
    pub fn fixed(gas_price_wei: u128) -> Self {
        Self::Fixed { gas_price_wei }
    }

    pub fn oracle(
        url: impl Into<String>,
        field: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ChainClientError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainClientError::RpcError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self::Oracle {
            client,
            url: url.into(),
            field: field.into(),
        })
    }

    /// Short name of the active strategy, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FeeEstimator::Fixed { .. } => "fixed",
            FeeEstimator::Oracle { .. } => "oracle",
            FeeEstimator::Rpc => "rpc",
        }
    }

    /// Gas price in wei for the next transfer on the network served by `rpc`.
    pub async fn gas_price(&self, rpc: &dyn EvmRpc) -> Result<u128, ChainClientError> {
        match self {
            FeeEstimator::Fixed { gas_price_wei } => Ok(*gas_price_wei),
            FeeEstimator::Rpc => rpc.get_gas_price().await,
            FeeEstimator::Oracle { client, url, field } => {
                fetch_oracle_price(client, url, field).await
            }
        }
    }
}

async fn fetch_oracle_price(
    client: &reqwest::Client,
    url: &str,
    field: &str,
) -> Result<u128, ChainClientError> {
    let response = client
        .get(url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| ChainClientError::RpcError(format!("Gas oracle request failed: {e}")))?;

    let body: Value = response.json().await.map_err(|e| {
        ChainClientError::RpcError(format!("Gas oracle returned invalid JSON: {e}"))
    })?;
    parse_oracle_price(&body, field)
}

/// Read a gwei price from a gas oracle response and convert it to wei.
///
/// The field may be a JSON number or a numeric string, and may be nested
/// under a top-level `result` object (Etherscan-style responses).
pub fn parse_oracle_price(body: &Value, field: &str) -> Result<u128, ChainClientError> {
    let raw = body
        .get(field)
        .or_else(|| body.get("result").and_then(|r| r.get(field)))
        .ok_or_else(|| {
            ChainClientError::RpcError(format!("Gas oracle response has no `{field}`"))
        })?;

    let gwei = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|g| g.is_finite() && *g > 0.0)
    .ok_or_else(|| {
        ChainClientError::RpcError(format!("Gas oracle `{field}` is not a positive number"))
    })?;

    Ok((gwei * WEI_PER_GWEI).round() as u128)
}
