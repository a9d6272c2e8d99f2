// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Solana RPC client and keypair helpers.

use std::{str::FromStr, time::Duration};

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{
    commitment_config::CommitmentConfig,
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature},
    transaction::Transaction,
};

#[cfg(test)]
use mockall::automock;

use super::client::ChainClientError;
use super::types::NetworkProfile;

/// The RPC calls the transfer workflow needs from a Solana cluster.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SolanaRpc: Send + Sync {
    /// Balance of `pubkey` in lamports.
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ChainClientError>;

    async fn get_latest_blockhash(&self) -> Result<Hash, ChainClientError>;

    /// Submit a signed transaction and block until the cluster confirms it.
    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, ChainClientError>;
}

/// Solana client using the nonblocking RPC client at `confirmed` commitment.
pub struct SolanaClient {
    client: RpcClient,
}

impl SolanaClient {
    pub fn new(network: &NetworkProfile, timeout: Duration) -> Result<Self, ChainClientError> {
        url::Url::parse(&network.rpc_url)
            .map_err(|e| ChainClientError::InvalidRpcUrl(e.to_string()))?;

        let client = RpcClient::new_with_timeout_and_commitment(
            network.rpc_url.clone(),
            timeout,
            CommitmentConfig::confirmed(),
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl SolanaRpc for SolanaClient {
    async fn get_balance(&self, pubkey: &Pubkey) -> Result<u64, ChainClientError> {
        self.client
            .get_balance(pubkey)
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn get_latest_blockhash(&self) -> Result<Hash, ChainClientError> {
        self.client
            .get_latest_blockhash()
            .await
            .map_err(|e| ChainClientError::RpcError(e.to_string()))
    }

    async fn send_and_confirm_transaction(
        &self,
        transaction: &Transaction,
    ) -> Result<Signature, ChainClientError> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(|e| ChainClientError::TransactionFailed(e.to_string()))
    }
}

/// Parse a base58 Solana public key.
pub fn parse_pubkey(address: &str) -> Result<Pubkey, ChainClientError> {
    Pubkey::from_str(address.trim()).map_err(|e| ChainClientError::InvalidAddress(e.to_string()))
}

/// Parse a Solana secret key.
///
/// Accepts the base58 encoding of the 64-byte keypair (the format returned by
/// keypair creation and used by most wallets) or a JSON byte array as written
/// by `solana-keygen`.
pub fn parse_keypair(secret: &str) -> Result<Keypair, ChainClientError> {
    let secret = secret.trim();
    let bytes = if secret.starts_with('[') {
        serde_json::from_str::<Vec<u8>>(secret)
            .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid byte array: {e}")))?
    } else {
        bs58::decode(secret)
            .into_vec()
            .map_err(|e| ChainClientError::InvalidPrivateKey(format!("Invalid base58: {e}")))?
    };
    let bytes = zeroize::Zeroizing::new(bytes);

    if bytes.len() != 64 {
        return Err(ChainClientError::InvalidPrivateKey(format!(
            "Expected 64 key bytes, got {}",
            bytes.len()
        )));
    }

    Keypair::try_from(bytes.as_slice())
        .map_err(|e| ChainClientError::InvalidPrivateKey(e.to_string()))
}

/// Generate a fresh keypair from the OS random number generator.
pub fn generate_keypair() -> Keypair {
    Keypair::new()
}
