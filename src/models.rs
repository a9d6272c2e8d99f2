// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the REST API. Request fields use the
//! camelCase names clients already send (`privateKey`), and transfer input
//! is accepted as loosely typed JSON so that validation can report every
//! missing or mistyped field at once instead of failing on the first.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Query Parameters
// =============================================================================

/// Network selector accepted as a query parameter.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct NetworkQuery {
    /// `eth`, `bsc` or `solana`. Defaults to `bsc`.
    pub network: Option<String>,
}

// =============================================================================
// Balance
// =============================================================================

/// Native balance of an address.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct BalanceResponse {
    /// Balance in the native unit (ETH, BNB or SOL), trailing zeros trimmed.
    #[schema(example = "1.5")]
    pub amount: String,
}

// =============================================================================
// Keypair Creation
// =============================================================================

/// Freshly generated keypair.
///
/// The secret is returned in plaintext; callers must only reach this endpoint
/// over an encrypted, authenticated channel.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeypairResponse {
    /// Base58 public key.
    pub address: String,
    /// Base58 encoding of the 64-byte keypair.
    pub private_key: String,
}

// =============================================================================
// Transfer
// =============================================================================

/// Raw transfer request body.
///
/// Every field is optional here; [`crate::transfer::validate_transfer`] turns
/// it into a typed request or a list of field errors.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferPayload {
    /// Hex secp256k1 key (EVM) or base58 / JSON-array keypair (Solana).
    #[schema(value_type = String)]
    pub private_key: Option<Value>,
    /// Decimal amount in the native unit, as a string or number.
    #[schema(value_type = String, example = "0.01")]
    pub amount: Option<Value>,
    /// Recipient address.
    #[schema(value_type = String)]
    pub receiver: Option<Value>,
    /// `eth`, `bsc` or `solana`.
    #[schema(value_type = String, example = "eth")]
    pub network: Option<Value>,
}

/// Successful transfer submission.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(untagged)]
pub enum TransferResponse {
    /// EVM transaction hash, returned as soon as the node accepts it.
    Evm { hash: String },
    /// Solana signature, returned after cluster confirmation.
    Solana { signature: String },
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// `ValidationError` when field errors are present.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Messages per invalid field.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub errors: Option<Value>,
}
