// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{error::Error, net::SocketAddr, time::Duration};

use chain_relay::{
    api::router,
    config::{AppConfig, LogFormat},
    state::AppState,
    tls::rustls_config,
    transfer::{NetworkRegistry, TransferExecutor},
};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // A missing .env file is fine; the process environment is used as-is.
    let _ = dotenvy::dotenv();

    let config = AppConfig::from_env()?;
    init_tracing(config.log_format);

    // Install the ring crypto provider for rustls (must be done before any TLS operations)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| "Failed to install rustls crypto provider")?;

    let fees = config.fee_estimator()?;
    tracing::info!(strategy = fees.kind(), "Fee estimator configured");

    let networks = NetworkRegistry::from_config(&config)?;
    for network in networks.networks() {
        tracing::info!(%network, "Network enabled");
    }

    let executor = TransferExecutor::new(fees, config.rpc_timeout, config.confirm_timeout);
    let app = router(AppState::new(networks, executor, config.rpc_timeout));
    let addr = SocketAddr::new(config.host, config.port);

    match &config.tls {
        Some(paths) => {
            let tls_config = rustls_config(paths)?;
            let handle = axum_server::Handle::new();
            let shutdown = handle.clone();
            tokio::spawn(async move {
                shutdown_signal().await;
                shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
            });

            tracing::info!(%addr, "Chain relay listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls_config)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            tracing::warn!(
                "TLS is not configured; private keys in /api/transfer and /api/create \
                 travel in plaintext"
            );
            tracing::info!(%addr, "Chain relay listening on http (docs at /docs)");

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await?;
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    match format {
        LogFormat::Json => builder.json().with_current_span(true).init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
