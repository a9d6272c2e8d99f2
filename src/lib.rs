// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chain Relay - HTTP transfer gateway for EVM chains and Solana
//!
//! A thin JSON API that checks balances, creates Solana keypairs and signs
//! and submits native-currency transfers on Ethereum, BNB Smart Chain and
//! Solana on behalf of callers that supply their own keys.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `blockchain` - EVM and Solana RPC clients, signing and amounts
//! - `transfer` - Validation, network selection and transfer execution
//! - `config` - Environment configuration

pub mod api;
pub mod blockchain;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod tls;
pub mod transfer;
