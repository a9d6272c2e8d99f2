// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Keypair creation.

use axum::{extract::Query, Json};
use solana_sdk::signer::Signer;

use crate::{
    blockchain::{solana::generate_keypair, Network},
    error::ApiError,
    models::{CreateKeypairResponse, ErrorResponse, NetworkQuery},
    transfer::TransferError,
};

/// Generate a new Solana keypair.
///
/// Only `network=solana` is supported. The secret is returned in the response
/// body and never stored; reach this endpoint over TLS only.
#[utoipa::path(
    post,
    path = "/api/create",
    tag = "Keys",
    params(NetworkQuery),
    responses(
        (status = 200, description = "Keypair generated", body = CreateKeypairResponse),
        (status = 400, description = "Unsupported network", body = ErrorResponse)
    )
)]
pub async fn create_keypair(
    Query(query): Query<NetworkQuery>,
) -> Result<Json<CreateKeypairResponse>, ApiError> {
    let network = Network::resolve(query.network.as_deref())
        .map_err(TransferError::UnsupportedNetwork)?;
    if network != Network::Solana {
        return Err(TransferError::UnsupportedNetwork(format!(
            "keypair creation is not available for {network}"
        ))
        .into());
    }

    let keypair = generate_keypair();
    let address = keypair.pubkey().to_string();

    tracing::info!(network = %network, %address, "Keypair generated");

    Ok(Json(CreateKeypairResponse {
        address,
        private_key: keypair.to_base58_string(),
    }))
}
