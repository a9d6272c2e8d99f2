// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native balance lookup.

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    blockchain::{format_amount, parse_evm_address, solana::parse_pubkey},
    error::ApiError,
    models::{BalanceResponse, ErrorResponse, NetworkQuery},
    state::AppState,
    transfer::{bounded, ChainClient, TransferError, ValidationErrors},
};

/// Get the native balance of an address.
///
/// Returns ETH, BNB or SOL depending on `network` (default `bsc`), as a
/// decimal string in the native unit.
#[utoipa::path(
    get,
    path = "/api/balance/{address}",
    tag = "Balance",
    params(
        (
            "address" = String,
            Path,
            description = "0x-prefixed EVM address or base58 Solana public key"
        ),
        NetworkQuery
    ),
    responses(
        (status = 200, description = "Balance retrieved", body = BalanceResponse),
        (status = 400, description = "Unsupported network", body = ErrorResponse),
        (status = 401, description = "Malformed address", body = ErrorResponse),
        (status = 500, description = "RPC failure", body = ErrorResponse)
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Query(query): Query<NetworkQuery>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let entry = state.networks.select(query.network.as_deref())?;
    let timeout = state.rpc_timeout;
    let profile = &entry.profile;

    let amount = match &entry.client {
        ChainClient::Evm(rpc) => {
            let address = parse_evm_address(&address).map_err(invalid_address)?;
            let wei = bounded(timeout, "eth_getBalance", rpc.get_balance(address)).await?;
            format_amount(wei, profile.decimals)
        }
        ChainClient::Solana(rpc) => {
            let pubkey = parse_pubkey(&address).map_err(invalid_address)?;
            let lamports = bounded(timeout, "getBalance", rpc.get_balance(&pubkey)).await?;
            format_amount(alloy::primitives::U256::from(lamports), profile.decimals)
        }
    };

    tracing::debug!(network = %profile.network, %address, %amount, "Balance retrieved");

    Ok(Json(BalanceResponse { amount }))
}

fn invalid_address(err: impl std::fmt::Display) -> TransferError {
    TransferError::Validation(ValidationErrors::field("address", err.to_string()))
}
