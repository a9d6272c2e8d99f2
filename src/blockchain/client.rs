// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON-RPC client for Ethereum-compatible chains.

use std::str::FromStr;

use alloy::{
    network::Ethereum,
    primitives::{Address, B256, U256},
    providers::{Provider, RootProvider},
    signers::local::PrivateKeySigner,
};
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use super::types::NetworkProfile;

/// The RPC calls the transfer workflow needs from an EVM node.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EvmRpc: Send + Sync {
    /// Native balance in wei at the latest block.
    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError>;

    /// Transaction count (next nonce) of `address`.
    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainClientError>;

    /// Current legacy gas price in wei.
    async fn get_gas_price(&self) -> Result<u128, ChainClientError>;

    /// Broadcast a signed, EIP-2718 encoded transaction and return its hash.
    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<B256, ChainClientError>;
}

/// EVM chain client backed by an alloy HTTP provider.
pub struct EvmClient {
    provider: RootProvider<Ethereum>,
}

impl EvmClient {
    /// Create a new client for the specified network.
    pub fn new(network: &NetworkProfile) -> Result<Self, ChainClientError> {
        let url: url::Url = network.rpc_url.parse().map_err(|e: url::ParseError| {
            ChainClientError::InvalidRpcUrl(e.to_string())
        })?;

        Ok(Self {
            provider: RootProvider::new_http(url),
        })
    }

    /// Create a signer from a hex private key, with or without `0x` prefix.
    pub fn create_signer(private_key_hex: &str) -> Result<PrivateKeySigner, ChainClientError> {
        let trimmed = private_key_hex.trim();
        let key_bytes = alloy::hex::decode(trimmed.strip_prefix("0x").unwrap_or(trimmed))
            .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))?;

        PrivateKeySigner::from_slice(&key_bytes)
            .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
    }
}

#[async_trait]
impl EvmRpc for EvmClient {
    async fn get_balance(&self, address: Address) -> Result<U256, ChainClientError> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn get_transaction_count(&self, address: Address) -> Result<u64, ChainClientError> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn get_gas_price(&self) -> Result<u128, ChainClientError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn send_raw_transaction(&self, raw: Vec<u8>) -> Result<B256, ChainClientError> {
        let pending = self
            .provider
            .send_raw_transaction(&raw)
            .await
            .map_err(|e| ChainClientError::TransactionFailed(e.to_string()))?;

        Ok(*pending.tx_hash())
    }
}

/// Parse a 0x-prefixed, 20-byte EVM address.
pub fn parse_evm_address(address: &str) -> Result<Address, ChainClientError> {
    let address = address.trim();
    if !address.starts_with("0x") {
        return Err(ChainClientError::InvalidAddress(
            "Address must start with 0x".to_string(),
        ));
    }
    Address::from_str(address).map_err(|e| ChainClientError::InvalidAddress(e.to_string()))
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, thiserror::Error)]
pub enum ChainClientError {
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("RPC error: {0}")]
    RpcError(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),
}

impl ChainClientError {
    /// Whether a node rejected the transaction because the sender cannot cover it.
    pub fn is_insufficient_funds(&self) -> bool {
        match self {
            ChainClientError::TransactionFailed(msg) | ChainClientError::RpcError(msg) => {
                let msg = msg.to_ascii_lowercase();
                msg.contains("insufficient funds") || msg.contains("insufficient lamports")
            }
            _ => false,
        }
    }
}
