// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures of the fund REST API. All types derive
//! `Serialize`/`Deserialize` and `ToSchema` for JSON handling and OpenAPI
//! documentation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// =============================================================================
// Fund Identifier
// =============================================================================

/// Client-generated fund identifier (UUID v4, 36 characters).
///
/// Generated once per create request, before submission. A caller retrying
/// a create must reuse the same id so the contract can treat the retry as
/// the same fund.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct FundId(String);

impl FundId {
    /// Draw a fresh random identifier. Stateless; safe from any task.
    pub fn generate() -> Self {
        FundId(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FundId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FundId {
    fn from(value: String) -> Self {
        FundId(value)
    }
}

// =============================================================================
// Fund Models
// =============================================================================

/// Request body of `POST /funds`.
///
/// Both fields are optional at the JSON layer so that a missing field is
/// reported by the validator with its name instead of a generic parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FundCreateRequest {
    /// Display name of the fund.
    #[serde(default)]
    pub name: Option<String>,
    /// Inception date, `YYYY-MM-DD`.
    #[serde(default)]
    #[schema(example = "2024-01-01")]
    pub inception_date: Option<String>,
}

/// Response body of a successful `POST /funds`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateFundResponse {
    /// Identifier under which the fund was committed.
    pub fund_id: FundId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn fund_ids_are_uuid_strings() {
        let id = FundId::generate();
        assert_eq!(id.as_str().len(), 36);
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn concurrent_fund_ids_do_not_collide() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 125_000;

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                std::thread::spawn(|| {
                    (0..PER_THREAD)
                        .map(|_| FundId::generate())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::with_capacity(THREADS * PER_THREAD);
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "Generated duplicate fund id");
            }
        }
        assert_eq!(seen.len(), 1_000_000);
    }

    #[test]
    fn create_request_uses_camel_case() {
        let request: FundCreateRequest =
            serde_json::from_str(r#"{"name":"Fund A","inceptionDate":"2024-01-01"}"#).unwrap();
        assert_eq!(request.name.as_deref(), Some("Fund A"));
        assert_eq!(request.inception_date.as_deref(), Some("2024-01-01"));

        let missing: FundCreateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(missing, FundCreateRequest::default());
    }

    #[test]
    fn create_response_serializes_fund_id_as_string() {
        let response = CreateFundResponse {
            fund_id: FundId::from("abc".to_string()),
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"fundId":"abc"}"#
        );
    }
}
