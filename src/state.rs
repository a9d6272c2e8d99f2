// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::{sync::Arc, time::Duration};

use crate::transfer::{NetworkRegistry, TransferExecutor};

/// Shared, read-only handler state built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub networks: Arc<NetworkRegistry>,
    pub executor: Arc<TransferExecutor>,
    /// Bound on read-only RPC calls made directly by handlers.
    pub rpc_timeout: Duration,
}

impl AppState {
    pub fn new(
        networks: NetworkRegistry,
        executor: TransferExecutor,
        rpc_timeout: Duration,
    ) -> Self {
        Self {
            networks: Arc::new(networks),
            executor: Arc::new(executor),
            rpc_timeout,
        }
    }
}
