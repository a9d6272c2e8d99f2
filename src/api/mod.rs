// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::HeaderName,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        BalanceResponse, CreateKeypairResponse, ErrorResponse, TransferPayload, TransferResponse,
    },
    state::AppState,
};

pub mod balance;
pub mod health;
pub mod keys;
pub mod transfer;

const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/balance/{address}", get(balance::get_balance))
        .route("/create", post(keys::create_keypair))
        .route("/transfer", post(transfer::transfer))
        .with_state(state);

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health::liveness))
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id))
                .layer(CorsLayer::permissive()),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        balance::get_balance,
        keys::create_keypair,
        transfer::transfer,
        health::liveness
    ),
    components(
        schemas(
            BalanceResponse,
            CreateKeypairResponse,
            TransferPayload,
            TransferResponse,
            ErrorResponse,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Balance", description = "Native balance lookup"),
        (name = "Keys", description = "Keypair generation"),
        (name = "Transfer", description = "Native-currency transfers"),
        (name = "Health", description = "Liveness probe")
    )
)]
struct ApiDoc;
