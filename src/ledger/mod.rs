// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ledger network integration.
//!
//! This module provides functionality for:
//! - Loading the connection profile
//! - Establishing the session and resolving channel and contract
//! - Submitting and evaluating contract transactions

pub mod client;
pub mod connector;
pub mod gateway;
pub mod profile;

pub use client::{LedgerContract, PeerClient};
pub use connector::{ConnectivityError, ConnectorError, LedgerConnector, ResolutionError, Session};
pub use gateway::{Contract, LedgerError, TransactionGateway, TransactionOutcome, UnavailableCause};
pub use profile::{ConnectionProfile, PeerEndpoint, ProfileError};
