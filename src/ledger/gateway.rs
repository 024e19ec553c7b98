// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Submit/evaluate protocol over a resolved contract handle.
//!
//! `submit` goes through endorsement, ordering and commit; `evaluate` reads
//! one peer's current state. Both are bounded by a timeout and both hand
//! every failure back as a [`TransactionOutcome`]. Nothing here retries:
//! a submit that timed out may still commit on the ledger, so a caller that
//! retries must reuse its business key (the fund id).
//!
//! Dropping a pending call (for example when the HTTP client disconnects)
//! abandons the wait only. An abandoned submission can still be committed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Failure reported by a contract handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// The contract refused the transaction or query.
    #[error("rejected by contract: {0}")]
    Rejected(String),

    #[error("timed out")]
    Timeout,

    #[error("peer unreachable: {0}")]
    Unreachable(String),

    #[error("peer error: {0}")]
    Peer(String),
}

/// A named contract on a resolved channel.
///
/// Implementations must be safe to call from many tasks at once.
#[async_trait]
pub trait Contract: Send + Sync {
    /// Contract name on the channel.
    fn name(&self) -> &str;

    /// Endorse, order and commit a transaction; returns the contract response.
    async fn submit_transaction(&self, function: &str, args: &[String])
        -> Result<Vec<u8>, LedgerError>;

    /// Run a read-only query against a single peer.
    async fn evaluate_transaction(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError>;

    /// Release the underlying connection. Later calls fail as unreachable.
    fn close(&self) {}
}

/// Why a ledger call could not produce an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnavailableCause {
    #[error("timed out")]
    Timeout,

    #[error("unreachable: {0}")]
    Unreachable(String),

    #[error("peer error: {0}")]
    Peer(String),
}

/// Result of a submit or evaluate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    /// Success, with the contract-defined response bytes. Evaluations use
    /// the same shape even though nothing was ordered.
    Committed(Vec<u8>),
    /// Refused by contract logic; the caller's request is at fault.
    Rejected(String),
    /// Network, consensus or timeout failure; safe for the caller to retry.
    Unavailable(UnavailableCause),
}

impl From<Result<Vec<u8>, LedgerError>> for TransactionOutcome {
    fn from(result: Result<Vec<u8>, LedgerError>) -> Self {
        match result {
            Ok(payload) => TransactionOutcome::Committed(payload),
            Err(LedgerError::Rejected(reason)) => TransactionOutcome::Rejected(reason),
            Err(LedgerError::Timeout) => TransactionOutcome::Unavailable(UnavailableCause::Timeout),
            Err(LedgerError::Unreachable(detail)) => {
                TransactionOutcome::Unavailable(UnavailableCause::Unreachable(detail))
            }
            Err(LedgerError::Peer(detail)) => {
                TransactionOutcome::Unavailable(UnavailableCause::Peer(detail))
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Mode {
    Submit,
    Evaluate,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Mode::Submit => "submit",
            Mode::Evaluate => "evaluate",
        }
    }
}

/// Transaction gateway shared by all request handlers.
#[derive(Clone)]
pub struct TransactionGateway {
    contract: Arc<dyn Contract>,
    channel: String,
    timeout: Duration,
}

impl TransactionGateway {
    /// `timeout` caps every call, whatever limit the caller asks for.
    pub fn new(contract: Arc<dyn Contract>, channel: impl Into<String>, timeout: Duration) -> Self {
        Self {
            contract,
            channel: channel.into(),
            timeout,
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn contract_name(&self) -> &str {
        self.contract.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Submit a state-changing transaction under the default timeout.
    pub async fn submit(&self, function: &str, args: &[&str]) -> TransactionOutcome {
        self.submit_within(function, args, None).await
    }

    /// Submit with an additional caller deadline.
    pub async fn submit_within(
        &self,
        function: &str,
        args: &[&str],
        limit: Option<Duration>,
    ) -> TransactionOutcome {
        self.invoke(Mode::Submit, function, args, limit).await
    }

    /// Evaluate a read-only query under the default timeout.
    pub async fn evaluate(&self, function: &str, args: &[&str]) -> TransactionOutcome {
        self.evaluate_within(function, args, None).await
    }

    pub async fn evaluate_within(
        &self,
        function: &str,
        args: &[&str],
        limit: Option<Duration>,
    ) -> TransactionOutcome {
        self.invoke(Mode::Evaluate, function, args, limit).await
    }

    async fn invoke(
        &self,
        mode: Mode,
        function: &str,
        args: &[&str],
        limit: Option<Duration>,
    ) -> TransactionOutcome {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        let bound = limit.map_or(self.timeout, |l| l.min(self.timeout));
        let started = Instant::now();

        let call = async {
            match mode {
                Mode::Submit => self.contract.submit_transaction(function, &args).await,
                Mode::Evaluate => self.contract.evaluate_transaction(function, &args).await,
            }
        };

        let outcome = match tokio::time::timeout(bound, call).await {
            Ok(result) => TransactionOutcome::from(result),
            Err(_) => TransactionOutcome::Unavailable(UnavailableCause::Timeout),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            TransactionOutcome::Committed(payload) => debug!(
                mode = mode.as_str(),
                function,
                channel = %self.channel,
                elapsed_ms,
                payload_len = payload.len(),
                "Ledger call succeeded"
            ),
            TransactionOutcome::Rejected(reason) => info!(
                mode = mode.as_str(),
                function,
                channel = %self.channel,
                elapsed_ms,
                reason = %reason,
                "Ledger call rejected by contract"
            ),
            TransactionOutcome::Unavailable(cause) => warn!(
                mode = mode.as_str(),
                function,
                channel = %self.channel,
                elapsed_ms,
                cause = %cause,
                "Ledger unavailable"
            ),
        }

        outcome
    }
}
