// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;
use crate::identity::{IdentityStoreError, ProvisionError};
use crate::ledger::{ConnectorError, UnavailableCause};
use crate::validation::ValidationError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    /// Request field that failed validation, if any.
    pub field: Option<&'static str>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'static str>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            field: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_implemented() -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, "not implemented")
    }

    /// Map a ledger availability failure to 504 (timeout) or 502 (anything else).
    pub fn unavailable(cause: &UnavailableCause) -> Self {
        match cause {
            UnavailableCause::Timeout => {
                Self::new(StatusCode::GATEWAY_TIMEOUT, "ledger request timed out")
            }
            UnavailableCause::Unreachable(_) => {
                Self::new(StatusCode::BAD_GATEWAY, "ledger unreachable")
            }
            UnavailableCause::Peer(_) => Self::new(StatusCode::BAD_GATEWAY, "ledger unavailable"),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
            field: Some(err.field),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            field: self.field,
        });
        (self.status, body).into_response()
    }
}

/// Failures that prevent the service from starting. All of them are fatal
/// and are reported before the listener binds.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("identity store error: {0}")]
    IdentityStore(#[from] IdentityStoreError),

    #[error("identity provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("ledger connection failed: {0}")]
    Connect(#[from] ConnectorError),

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
