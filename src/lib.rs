// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fund Admin Gateway - ledger-backed fund administration service
//!
//! Provisions the application identity into a local wallet, opens a session
//! against a permissioned ledger network and exposes fund creation and lookup
//! as a small REST API.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `identity` - Wallet of enrolled identities and first-run provisioning
//! - `ledger` - Connection profile, peer session and transaction gateway
//! - `validation` - Fund request validation

pub mod api;
pub mod config;
pub mod error;
pub mod identity;
pub mod ledger;
pub mod models;
pub mod state;
pub mod validation;
