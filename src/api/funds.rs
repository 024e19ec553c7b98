// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fund API endpoints.
//!
//! Creation validates the body, draws a fund id and submits `CreateFund`;
//! lookup evaluates `QueryFundById`. Ledger outcomes map to responses:
//!
//! | Outcome | Create | Get |
//! |---------|--------|-----|
//! | `Committed` | 200 `{fundId}` | 200 payload |
//! | `Rejected` | 400 | 404 |
//! | `Unavailable` | 502 / 504 | 502 / 504 |

use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::HeaderMap,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::{
    error::ApiError,
    ledger::{TransactionGateway, TransactionOutcome},
    models::{CreateFundResponse, FundCreateRequest, FundId},
    state::AppState,
    validation::{validate, ValidFundRequest},
};

/// Contract function creating a fund: `(fundId, name, inceptionDate)`.
pub const CREATE_FUND: &str = "CreateFund";
/// Contract query returning one fund: `(fundId)`.
pub const QUERY_FUND_BY_ID: &str = "QueryFundById";

/// Optional per-request ledger time limit, in milliseconds.
pub const REQUEST_TIMEOUT_HEADER: &str = "x-request-timeout-ms";

/// Read the caller's time limit, if any.
pub fn request_deadline(headers: &HeaderMap) -> Result<Option<Duration>, ApiError> {
    let Some(value) = headers.get(REQUEST_TIMEOUT_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<u64>().ok())
        .filter(|ms| *ms > 0)
        .map(|ms| Some(Duration::from_millis(ms)))
        .ok_or_else(|| ApiError::bad_request(format!("invalid {REQUEST_TIMEOUT_HEADER} header")))
}

/// Submit `CreateFund` for an id the caller already holds.
///
/// The id is passed through untouched, so a caller retrying after an
/// unavailable outcome resubmits the same fund.
pub async fn submit_create_fund(
    gateway: &TransactionGateway,
    fund_id: &FundId,
    request: &ValidFundRequest,
    limit: Option<Duration>,
) -> TransactionOutcome {
    gateway
        .submit_within(
            CREATE_FUND,
            &[
                fund_id.as_str(),
                request.name.as_str(),
                request.inception_date.as_str(),
            ],
            limit,
        )
        .await
}

/// Create a new fund on the ledger.
#[utoipa::path(
    post,
    path = "/funds",
    tag = "Funds",
    request_body = FundCreateRequest,
    params(
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Ledger time limit in milliseconds")
    ),
    responses(
        (status = 200, description = "Fund committed", body = CreateFundResponse),
        (status = 400, description = "Missing or invalid field, or refused by the contract"),
        (status = 502, description = "Ledger unavailable"),
        (status = 504, description = "Ledger timed out")
    )
)]
pub async fn create_fund(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<FundCreateRequest>, JsonRejection>,
) -> Result<Json<CreateFundResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|_| ApiError::bad_request("malformed request body"))?;
    let valid = validate(&request)?;
    let limit = request_deadline(&headers)?;

    let fund_id = FundId::generate();
    match submit_create_fund(&state.gateway, &fund_id, &valid, limit).await {
        TransactionOutcome::Committed(_) => {
            info!(fund_id = %fund_id, name = %valid.name, "Fund created");
            Ok(Json(CreateFundResponse { fund_id }))
        }
        TransactionOutcome::Rejected(reason) => Err(ApiError::bad_request(reason)),
        TransactionOutcome::Unavailable(cause) => Err(ApiError::unavailable(&cause)),
    }
}

/// Get a fund by id.
///
/// Returns the contract's payload; non-JSON payloads are returned as a
/// JSON string.
#[utoipa::path(
    get,
    path = "/funds/{id}",
    tag = "Funds",
    params(
        ("id" = String, Path, description = "Fund ID"),
        ("x-request-timeout-ms" = Option<u64>, Header, description = "Ledger time limit in milliseconds")
    ),
    responses(
        (status = 200, description = "Fund record as stored on the ledger"),
        (status = 404, description = "Fund not found"),
        (status = 502, description = "Ledger unavailable"),
        (status = 504, description = "Ledger timed out")
    )
)]
pub async fn get_fund(
    State(state): State<AppState>,
    Path(fund_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    let limit = request_deadline(&headers)?;
    match state
        .gateway
        .evaluate_within(QUERY_FUND_BY_ID, &[fund_id.as_str()], limit)
        .await
    {
        TransactionOutcome::Committed(payload) => Ok(Json(payload_to_json(&payload))),
        TransactionOutcome::Rejected(reason) => Err(ApiError::not_found(reason)),
        TransactionOutcome::Unavailable(cause) => Err(ApiError::unavailable(&cause)),
    }
}

fn payload_to_json(payload: &[u8]) -> Value {
    serde_json::from_slice(payload)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(payload).into_owned()))
}

/// Investors, capital accounts, portfolios and their action histories.
/// Reserved routes; not served yet.
#[utoipa::path(
    get,
    path = "/funds/{id}/investors",
    tag = "Funds",
    params(("id" = String, Path, description = "Fund ID")),
    responses((status = 501, description = "Not implemented"))
)]
pub async fn not_implemented(Path(_fund_id): Path<String>) -> ApiError {
    ApiError::not_implemented()
}
