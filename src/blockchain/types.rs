// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain types and constants.

use std::{fmt, str::FromStr};

use serde::Serialize;
use utoipa::ToSchema;

/// Decimals of ETH and BNB (1 ether = 10^18 wei).
pub const EVM_NATIVE_DECIMALS: u8 = 18;

/// Decimals of SOL (1 SOL = 10^9 lamports).
pub const SOLANA_NATIVE_DECIMALS: u8 = 9;

/// Gas limit of a plain value transfer with no calldata.
pub const NATIVE_TRANSFER_GAS_LIMIT: u64 = 21_000;

/// Network used when a request does not name one.
pub const DEFAULT_NETWORK: Network = Network::Bsc;

/// Networks the gateway can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Eth,
    Bsc,
    Solana,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Eth, Network::Bsc, Network::Solana];

    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Eth => "eth",
            Network::Bsc => "bsc",
            Network::Solana => "solana",
        }
    }

    /// Parse an optional request token, falling back to [`DEFAULT_NETWORK`].
    pub fn resolve(raw: Option<&str>) -> Result<Self, String> {
        match raw.map(str::trim) {
            None | Some("") => Ok(DEFAULT_NETWORK),
            Some(value) => value.parse(),
        }
    }
}

impl FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eth" => Ok(Network::Eth),
            "bsc" => Ok(Network::Bsc),
            "solana" => Ok(Network::Solana),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value embedded in a signed transaction that pins it to one network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainDiscriminator {
    /// EIP-155 chain id for account-model EVM chains.
    ChainId(u64),
    /// Solana cluster name (`devnet`, `testnet`, `mainnet-beta`).
    Cluster(String),
}

/// How transaction fees are priced on a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeeModel {
    /// Pre-EIP-1559 `gasPrice * gasLimit`.
    LegacyGasPrice,
    /// Solana signature fee paid in lamports, set by the cluster.
    SolanaLamports,
}

/// Resolved, immutable description of one network.
#[derive(Debug, Clone)]
pub struct NetworkProfile {
    pub network: Network,
    /// Network name for display
    pub name: String,
    /// RPC endpoint URL
    pub rpc_url: String,
    pub chain: ChainDiscriminator,
    pub fee_model: FeeModel,
    /// Native currency symbol
    pub symbol: &'static str,
    pub decimals: u8,
}

impl NetworkProfile {
    /// Profile for an EVM chain addressed by EIP-155 chain id.
    pub fn evm(network: Network, rpc_url: impl Into<String>, chain_id: u64) -> Self {
        let (name, symbol) = match network {
            Network::Eth => ("Ethereum", "ETH"),
            _ => ("BNB Smart Chain", "BNB"),
        };
        Self {
            network,
            name: name.to_string(),
            rpc_url: rpc_url.into(),
            chain: ChainDiscriminator::ChainId(chain_id),
            fee_model: FeeModel::LegacyGasPrice,
            symbol,
            decimals: EVM_NATIVE_DECIMALS,
        }
    }

    /// Profile for a Solana cluster.
    pub fn solana(rpc_url: impl Into<String>, cluster: impl Into<String>) -> Self {
        Self {
            network: Network::Solana,
            name: "Solana".to_string(),
            rpc_url: rpc_url.into(),
            chain: ChainDiscriminator::Cluster(cluster.into()),
            fee_model: FeeModel::SolanaLamports,
            symbol: "SOL",
            decimals: SOLANA_NATIVE_DECIMALS,
        }
    }

    /// EIP-155 chain id, if this is an EVM profile.
    pub fn chain_id(&self) -> Option<u64> {
        match self.chain {
            ChainDiscriminator::ChainId(id) => Some(id),
            ChainDiscriminator::Cluster(_) => None,
        }
    }
}
