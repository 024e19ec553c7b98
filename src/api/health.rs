// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

/// Health check response with individual component status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadyResponse {
    /// Overall health status ("ok" or "degraded").
    pub status: String,
    /// Individual health checks and their results.
    pub checks: HealthChecks,
}

/// Individual health check results.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthChecks {
    /// Whether the service process is running.
    pub service: String,
    /// Identity wallet directory availability (if configured).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet_dir: Option<String>,
    /// Channel the session is bound to.
    pub channel: String,
    /// Contract the session is bound to.
    pub contract: String,
    /// Upper bound on any single ledger call.
    pub ledger_timeout_ms: u64,
}

/// Simple health check response for liveness probes.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn check_wallet_dir(state: &AppState) -> Option<String> {
    state.wallet_dir.as_ref().map(|dir| {
        if dir.is_dir() { "ok" } else { "missing" }.to_string()
    })
}

/// Health check endpoint handler.
///
/// Returns 200 if all checks pass, 503 if any check fails. Does not call
/// the ledger: a slow network must not make the probe itself time out.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = ReadyResponse),
        (status = 503, description = "Service is unhealthy", body = ReadyResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let wallet_dir = check_wallet_dir(&state);
    let all_ok = wallet_dir.as_deref().map(|s| s == "ok").unwrap_or(true);

    let response = ReadyResponse {
        status: if all_ok { "ok" } else { "degraded" }.to_string(),
        checks: HealthChecks {
            service: "ok".to_string(),
            wallet_dir,
            channel: state.gateway.channel().to_string(),
            contract: state.gateway.contract_name().to_string(),
            ledger_timeout_ms: state.gateway.timeout().as_millis() as u64,
        },
    };

    let status = if all_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}

/// Liveness probe handler.
///
/// Always returns 200 if the process is running.
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = HealthResponse)
    )
)]
pub async fn liveness() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe handler.
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = ReadyResponse),
        (status = 503, description = "Service is not ready", body = ReadyResponse)
    )
)]
pub async fn readiness(state: State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    health(state).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::ledger::gateway::tests::ScriptedContract;
    use crate::ledger::TransactionGateway;

    fn state() -> AppState {
        AppState::new(TransactionGateway::new(
            Arc::new(ScriptedContract::committing()),
            "mychannel",
            Duration::from_secs(5),
        ))
    }

    #[tokio::test]
    async fn healthy_with_existing_wallet() {
        let dir = tempfile::tempdir().unwrap();
        let (status, Json(body)) = health(State(state().with_wallet_dir(dir.path()))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.status, "ok");
        assert_eq!(body.checks.wallet_dir.as_deref(), Some("ok"));
        assert_eq!(body.checks.channel, "mychannel");
        assert_eq!(body.checks.contract, "admin");
        assert_eq!(body.checks.ledger_timeout_ms, 5_000);
    }

    #[tokio::test]
    async fn degraded_when_wallet_missing() {
        let dir = tempfile::tempdir().unwrap();
        let gone = dir.path().join("wallet");
        let (status, Json(body)) = readiness(State(state().with_wallet_dir(gone))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
    }

    #[tokio::test]
    async fn liveness_is_always_ok() {
        assert_eq!(liveness().await.0.status, "ok");
    }
}
