// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Blockchain integration for EVM chains and Solana.
//!
//! This module provides functionality for:
//! - Querying native balances (ETH, BNB, SOL)
//! - Pricing gas for EVM transfers
//! - Building, signing and broadcasting native transfers

pub mod client;
pub mod fees;
pub mod solana;
pub mod transactions;
pub mod types;

pub use client::{parse_evm_address, ChainClientError, EvmClient, EvmRpc};
pub use fees::FeeEstimator;
pub use solana::{SolanaClient, SolanaRpc};
pub use transactions::{format_amount, parse_amount, parse_lamports};
pub use types::*;
