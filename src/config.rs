// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! All settings are read from the environment once at startup (a `.env` file
//! is loaded first when present) and parsed into an [`AppConfig`]. Invalid
//! values fail startup with a [`ConfigError`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `3000` |
//! | `ETH_NETWORK` | Ethereum JSON-RPC URL | Unset (eth disabled) |
//! | `BSC_NETWORK` | BNB Smart Chain JSON-RPC URL | Unset (bsc disabled) |
//! | `SOLANA_NETWORK` | Solana JSON-RPC URL | `https://api.devnet.solana.com` |
//! | `ETH_CHAIN_ID` | EIP-155 chain id for eth | `4` |
//! | `BSC_CHAIN_ID` | EIP-155 chain id for bsc | `97` |
//! | `SOLANA_CLUSTER` | Solana cluster name | `devnet` |
//! | `RPC_TIMEOUT_SECS` | Bound on each RPC call | `30` |
//! | `CONFIRM_TIMEOUT_SECS` | Bound on Solana submit-and-confirm | `60` |
//! | `FEE_STRATEGY` | `rpc`, `fixed` or `oracle` | `rpc` |
//! | `FIXED_GAS_PRICE_WEI` | Gas price for the `fixed` strategy | Required for `fixed` |
//! | `GAS_ORACLE_URL` | Gas station endpoint for `oracle` | Required for `oracle` |
//! | `GAS_ORACLE_FIELD` | JSON field holding the gwei price | `fast` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//! | `TLS_CERT_PATH` | PEM certificate chain | Unset (plain HTTP) |
//! | `TLS_KEY_PATH` | PEM private key | Unset (plain HTTP) |

use std::{net::IpAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::blockchain::{ChainClientError, FeeEstimator};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const ETH_NETWORK_ENV: &str = "ETH_NETWORK";
pub const BSC_NETWORK_ENV: &str = "BSC_NETWORK";
pub const SOLANA_NETWORK_ENV: &str = "SOLANA_NETWORK";
pub const ETH_CHAIN_ID_ENV: &str = "ETH_CHAIN_ID";
pub const BSC_CHAIN_ID_ENV: &str = "BSC_CHAIN_ID";
pub const SOLANA_CLUSTER_ENV: &str = "SOLANA_CLUSTER";
pub const RPC_TIMEOUT_SECS_ENV: &str = "RPC_TIMEOUT_SECS";
pub const CONFIRM_TIMEOUT_SECS_ENV: &str = "CONFIRM_TIMEOUT_SECS";
pub const FEE_STRATEGY_ENV: &str = "FEE_STRATEGY";
pub const FIXED_GAS_PRICE_WEI_ENV: &str = "FIXED_GAS_PRICE_WEI";
pub const GAS_ORACLE_URL_ENV: &str = "GAS_ORACLE_URL";
pub const GAS_ORACLE_FIELD_ENV: &str = "GAS_ORACLE_FIELD";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SOLANA_RPC_URL: &str = "https://api.devnet.solana.com";

/// Rinkeby. Deprecated upstream; override with `ETH_CHAIN_ID` for live use.
pub const DEFAULT_ETH_CHAIN_ID: u64 = 4;

/// BNB Smart Chain testnet.
pub const DEFAULT_BSC_CHAIN_ID: u64 = 97;

pub const DEFAULT_SOLANA_CLUSTER: &str = "devnet";
pub const DEFAULT_RPC_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_GAS_ORACLE_FIELD: &str = "fast";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },

    #[error("{name} is required when {context}")]
    Missing {
        name: &'static str,
        context: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
}

/// Source of EVM gas prices.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FeeStrategy {
    #[default]
    Rpc,
    Fixed {
        gas_price_wei: u128,
    },
    Oracle {
        url: String,
        field: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub eth_rpc_url: Option<String>,
    pub bsc_rpc_url: Option<String>,
    pub solana_rpc_url: String,
    pub eth_chain_id: u64,
    pub bsc_chain_id: u64,
    pub solana_cluster: String,
    pub rpc_timeout: Duration,
    pub confirm_timeout: Duration,
    pub fee_strategy: FeeStrategy,
    pub log_format: LogFormat,
    pub tls: Option<TlsPaths>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: DEFAULT_PORT,
            eth_rpc_url: None,
            bsc_rpc_url: None,
            solana_rpc_url: DEFAULT_SOLANA_RPC_URL.to_string(),
            eth_chain_id: DEFAULT_ETH_CHAIN_ID,
            bsc_chain_id: DEFAULT_BSC_CHAIN_ID,
            solana_cluster: DEFAULT_SOLANA_CLUSTER.to_string(),
            rpc_timeout: Duration::from_secs(DEFAULT_RPC_TIMEOUT_SECS),
            confirm_timeout: Duration::from_secs(DEFAULT_CONFIRM_TIMEOUT_SECS),
            fee_strategy: FeeStrategy::Rpc,
            log_format: LogFormat::Pretty,
            tls: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let fee_strategy = match get(FEE_STRATEGY_ENV)
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            None | Some("rpc") => FeeStrategy::Rpc,
            Some("fixed") => {
                let raw = get(FIXED_GAS_PRICE_WEI_ENV).ok_or(ConfigError::Missing {
                    name: FIXED_GAS_PRICE_WEI_ENV,
                    context: "FEE_STRATEGY=fixed",
                })?;
                FeeStrategy::Fixed {
                    gas_price_wei: parse_value(FIXED_GAS_PRICE_WEI_ENV, &raw)?,
                }
            }
            Some("oracle") => FeeStrategy::Oracle {
                url: get(GAS_ORACLE_URL_ENV).ok_or(ConfigError::Missing {
                    name: GAS_ORACLE_URL_ENV,
                    context: "FEE_STRATEGY=oracle",
                })?,
                field: get(GAS_ORACLE_FIELD_ENV)
                    .unwrap_or_else(|| DEFAULT_GAS_ORACLE_FIELD.to_string()),
            },
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: FEE_STRATEGY_ENV,
                    reason: format!("expected rpc, fixed or oracle, got {other}"),
                })
            }
        };

        let log_format = match get(LOG_FORMAT_ENV).map(|v| v.to_ascii_lowercase()).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected json or pretty, got {other}"),
                })
            }
        };

        let tls = match (get(TLS_CERT_PATH_ENV), get(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    name: TLS_KEY_PATH_ENV,
                    context: "TLS_CERT_PATH is set",
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing {
                    name: TLS_CERT_PATH_ENV,
                    context: "TLS_KEY_PATH is set",
                })
            }
        };

        Ok(Self {
            host: parse_or(HOST_ENV, get(HOST_ENV), defaults.host)?,
            port: parse_or(PORT_ENV, get(PORT_ENV), defaults.port)?,
            eth_rpc_url: get(ETH_NETWORK_ENV),
            bsc_rpc_url: get(BSC_NETWORK_ENV),
            solana_rpc_url: get(SOLANA_NETWORK_ENV).unwrap_or(defaults.solana_rpc_url),
            eth_chain_id: parse_or(ETH_CHAIN_ID_ENV, get(ETH_CHAIN_ID_ENV), defaults.eth_chain_id)?,
            bsc_chain_id: parse_or(BSC_CHAIN_ID_ENV, get(BSC_CHAIN_ID_ENV), defaults.bsc_chain_id)?,
            solana_cluster: get(SOLANA_CLUSTER_ENV).unwrap_or(defaults.solana_cluster),
            rpc_timeout: parse_secs(
                RPC_TIMEOUT_SECS_ENV,
                get(RPC_TIMEOUT_SECS_ENV),
                defaults.rpc_timeout,
            )?,
            confirm_timeout: parse_secs(
                CONFIRM_TIMEOUT_SECS_ENV,
                get(CONFIRM_TIMEOUT_SECS_ENV),
                defaults.confirm_timeout,
            )?,
            fee_strategy,
            log_format,
            tls,
        })
    }

    /// Instantiate the configured gas price strategy.
    pub fn fee_estimator(&self) -> Result<FeeEstimator, ChainClientError> {
        match &self.fee_strategy {
            FeeStrategy::Rpc => Ok(FeeEstimator::Rpc),
            FeeStrategy::Fixed { gas_price_wei } => Ok(FeeEstimator::fixed(*gas_price_wei)),
            FeeStrategy::Oracle { url, field } => {
                FeeEstimator::oracle(url.clone(), field.clone(), self.rpc_timeout)
            }
        }
    }
}

fn parse_value<T>(name: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.map_or(Ok(default), |v| parse_value(name, &v))
}

fn parse_secs(
    name: &'static str,
    raw: Option<String>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    let secs: u64 = parse_or(name, raw, default.as_secs())?;
    if secs == 0 {
        return Err(ConfigError::Invalid {
            name,
            reason: "must be at least 1 second".to_string(),
        });
    }
    Ok(Duration::from_secs(secs))
}
