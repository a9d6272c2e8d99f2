// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Native-currency transfer endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use crate::{
    error::ApiError,
    models::{ErrorResponse, TransferPayload, TransferResponse},
    state::AppState,
    transfer::submit_transfer,
};

/// Sign and submit a native transfer.
///
/// EVM networks return the transaction hash once the node accepts it; the
/// transaction is not yet mined. Solana returns the signature after the
/// cluster confirms it.
#[utoipa::path(
    post,
    path = "/api/transfer",
    tag = "Transfer",
    request_body = TransferPayload,
    responses(
        (status = 200, description = "Transfer submitted", body = TransferResponse),
        (status = 400, description = "Unsupported network or malformed JSON", body = ErrorResponse),
        (status = 401, description = "Invalid fields or insufficient funds", body = ErrorResponse),
        (status = 500, description = "RPC or submission failure", body = ErrorResponse)
    )
)]
pub async fn transfer(
    State(state): State<AppState>,
    payload: Result<Json<TransferPayload>, JsonRejection>,
) -> Result<Json<TransferResponse>, ApiError> {
    let Json(payload) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let result = submit_transfer(&state.networks, &state.executor, &payload).await;
    match &result {
        Ok(outcome) => tracing::info!(?outcome, "Transfer accepted"),
        Err(e) => tracing::info!(error = %e, "Transfer rejected"),
    }

    Ok(Json(result?.into()))
}
