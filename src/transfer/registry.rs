// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Network selection.
//!
//! The registry is built once at startup from [`AppConfig`] and shared
//! read-only by every request. It never changes after construction.

use std::{collections::HashMap, sync::Arc};

use super::error::TransferError;
use crate::{
    blockchain::{
        ChainClientError, EvmClient, EvmRpc, Network, NetworkProfile, SolanaClient, SolanaRpc,
    },
    config::AppConfig,
};

/// RPC client for a configured network.
#[derive(Clone)]
pub enum ChainClient {
    Evm(Arc<dyn EvmRpc>),
    Solana(Arc<dyn SolanaRpc>),
}

/// A network's profile and the client that talks to it.
#[derive(Clone)]
pub struct NetworkEntry {
    pub profile: NetworkProfile,
    pub client: ChainClient,
}

/// Immutable map of configured networks.
#[derive(Clone, Default)]
pub struct NetworkRegistry {
    entries: HashMap<Network, NetworkEntry>,
}

impl NetworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build profiles and clients for every network with an RPC URL.
    pub fn from_config(config: &AppConfig) -> Result<Self, ChainClientError> {
        let mut registry = Self::new();

        if let Some(url) = &config.eth_rpc_url {
            let profile = NetworkProfile::evm(Network::Eth, url.clone(), config.eth_chain_id);
            let client = EvmClient::new(&profile)?;
            registry = registry.with_evm(profile, Arc::new(client));
        }
        if let Some(url) = &config.bsc_rpc_url {
            let profile = NetworkProfile::evm(Network::Bsc, url.clone(), config.bsc_chain_id);
            let client = EvmClient::new(&profile)?;
            registry = registry.with_evm(profile, Arc::new(client));
        }
        let profile = NetworkProfile::solana(
            config.solana_rpc_url.clone(),
            config.solana_cluster.clone(),
        );
        let client = SolanaClient::new(&profile, config.rpc_timeout)?;
        registry = registry.with_solana(profile, Arc::new(client));

        Ok(registry)
    }

    pub fn with_evm(mut self, profile: NetworkProfile, client: Arc<dyn EvmRpc>) -> Self {
        self.entries.insert(
            profile.network,
            NetworkEntry {
                profile,
                client: ChainClient::Evm(client),
            },
        );
        self
    }

    pub fn with_solana(mut self, profile: NetworkProfile, client: Arc<dyn SolanaRpc>) -> Self {
        self.entries.insert(
            profile.network,
            NetworkEntry {
                profile,
                client: ChainClient::Solana(client),
            },
        );
        self
    }

    /// Resolve a network token (absent means the default network).
    ///
    /// Unknown tokens and networks without a configured RPC endpoint are
    /// both reported as unsupported.
    pub fn select(&self, raw: Option<&str>) -> Result<&NetworkEntry, TransferError> {
        let network = Network::resolve(raw).map_err(TransferError::UnsupportedNetwork)?;
        self.entries.get(&network).ok_or_else(|| {
            TransferError::UnsupportedNetwork(format!("{network} is not configured on this server"))
        })
    }

    /// Configured networks, in declaration order.
    pub fn networks(&self) -> Vec<Network> {
        Network::ALL
            .into_iter()
            .filter(|n| self.entries.contains_key(n))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::{client::MockEvmRpc, solana::MockSolanaRpc};

    fn registry() -> NetworkRegistry {
        NetworkRegistry::new()
            .with_evm(
                NetworkProfile::evm(Network::Eth, "http://eth.local", 4),
                Arc::new(MockEvmRpc::new()),
            )
            .with_evm(
                NetworkProfile::evm(Network::Bsc, "http://bsc.local", 97),
                Arc::new(MockEvmRpc::new()),
            )
            .with_solana(
                NetworkProfile::solana("http://sol.local", "devnet"),
                Arc::new(MockSolanaRpc::new()),
            )
    }

    #[test]
    fn selects_by_token() {
        let registry = registry();

        let eth = registry.select(Some("eth")).unwrap();
        assert_eq!(eth.profile.chain_id(), Some(4));
        assert!(matches!(eth.client, ChainClient::Evm(_)));

        let sol = registry.select(Some("SOLANA")).unwrap();
        assert!(matches!(sol.client, ChainClient::Solana(_)));
    }

    #[test]
    fn defaults_to_bsc() {
        let registry = registry();
        let entry = registry.select(None).unwrap();
        assert_eq!(entry.profile.network, Network::Bsc);
        assert_eq!(entry.profile.chain_id(), Some(97));
    }

    #[test]
    fn unknown_token_is_unsupported() {
        let err = registry().select(Some("polygon")).err().unwrap();
        assert!(matches!(err, TransferError::UnsupportedNetwork(ref n) if n == "polygon"));
    }

    #[test]
    fn unconfigured_network_is_unsupported() {
        let registry = NetworkRegistry::new().with_solana(
            NetworkProfile::solana("http://sol.local", "devnet"),
            Arc::new(MockSolanaRpc::new()),
        );
        assert!(matches!(
            registry.select(Some("eth")),
            Err(TransferError::UnsupportedNetwork(_))
        ));
        assert_eq!(registry.networks(), vec![Network::Solana]);
    }

    #[tokio::test]
    async fn builds_from_config() {
        let config = AppConfig {
            eth_rpc_url: Some("http://127.0.0.1:8545".into()),
            bsc_rpc_url: None,
            ..AppConfig::default()
        };
        let registry = NetworkRegistry::from_config(&config).unwrap();
        assert_eq!(registry.networks(), vec![Network::Eth, Network::Solana]);
    }

    #[tokio::test]
    async fn rejects_invalid_rpc_url() {
        let config = AppConfig {
            bsc_rpc_url: Some("::nope".into()),
            ..AppConfig::default()
        };
        assert!(matches!(
            NetworkRegistry::from_config(&config),
            Err(ChainClientError::InvalidRpcUrl(_))
        ));
    }
}
