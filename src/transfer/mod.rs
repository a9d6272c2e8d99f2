// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transfer orchestration.
//!
//! A transfer request flows through three stages, each returning a typed
//! result or a [`TransferError`]:
//!
//! 1. [`validate_transfer`] - required fields and types, no I/O
//! 2. [`NetworkRegistry::select`] - network token to profile and client
//! 3. [`TransferExecutor::execute`] - balance check, fee, sign, submit

pub mod error;
pub mod executor;
pub mod registry;
pub mod request;
pub mod validator;

pub use error::{TransferError, ValidationErrors};
pub use executor::{bounded, TransferExecutor};
pub use registry::{ChainClient, NetworkEntry, NetworkRegistry};
pub use request::{Amount, SecretKey, TransferRequest};
pub use validator::validate_transfer;

use crate::models::{TransferPayload, TransferResponse};

/// Identifier of a successfully submitted transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferResult {
    /// Accepted by an EVM node; not yet mined.
    EvmSubmitted { hash: String },
    /// Confirmed by the Solana cluster.
    SolanaConfirmed { signature: String },
}

impl From<TransferResult> for TransferResponse {
    fn from(result: TransferResult) -> Self {
        match result {
            TransferResult::EvmSubmitted { hash } => TransferResponse::Evm { hash },
            TransferResult::SolanaConfirmed { signature } => TransferResponse::Solana { signature },
        }
    }
}

/// Run the full validate, select, execute pipeline for one request.
pub async fn submit_transfer(
    registry: &NetworkRegistry,
    executor: &TransferExecutor,
    payload: &TransferPayload,
) -> Result<TransferResult, TransferError> {
    let request = validate_transfer(payload)?;
    let entry = registry.select(Some(request.network.as_str()))?;
    executor.execute(&request, entry).await
}
