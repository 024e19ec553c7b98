// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::path::PathBuf;
use std::sync::Arc;

use crate::ledger::TransactionGateway;

/// Immutable request context, built once at startup and cloned into every
/// handler. Holds no locks: the gateway is safe for concurrent use.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<TransactionGateway>,
    /// Wallet directory, checked by the readiness probe.
    pub wallet_dir: Option<PathBuf>,
}

impl AppState {
    pub fn new(gateway: TransactionGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
            wallet_dir: None,
        }
    }

    pub fn with_wallet_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.wallet_dir = Some(dir.into());
        self
    }
}
