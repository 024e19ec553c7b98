// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Validation of fund creation requests.
//!
//! Runs before any ledger interaction. Pure: no I/O, no clock.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::FundCreateRequest;

/// Accepted inception date format (ISO-8601 calendar date).
pub const INCEPTION_DATE_FORMAT: &str = "%Y-%m-%d";

/// First rule a request violated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {reason}")]
pub struct ValidationError {
    /// JSON name of the offending field.
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// A request that passed every rule, with the values to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFundRequest {
    pub name: String,
    /// The date exactly as the client sent it.
    pub inception_date: String,
}

/// Check `name`, then `inceptionDate`. Returns the first violation.
pub fn validate(request: &FundCreateRequest) -> Result<ValidFundRequest, ValidationError> {
    let name = match request.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name,
        Some(_) => return Err(ValidationError::new("name", "must not be empty")),
        None => return Err(ValidationError::new("name", "is required")),
    };

    let inception_date = match request.inception_date.as_deref().map(str::trim) {
        Some(date) if !date.is_empty() => date,
        _ => return Err(ValidationError::new("inceptionDate", "is required")),
    };

    // Parsing alone tolerates missing zero padding and signed years; the
    // value goes to the ledger verbatim, so it must round-trip exactly.
    let canonical = NaiveDate::parse_from_str(inception_date, INCEPTION_DATE_FORMAT)
        .map(|parsed| parsed.format(INCEPTION_DATE_FORMAT).to_string());
    if canonical.as_deref() != Ok(inception_date) {
        return Err(ValidationError::new(
            "inceptionDate",
            "must be a calendar date formatted as YYYY-MM-DD",
        ));
    }

    Ok(ValidFundRequest {
        name: name.to_string(),
        inception_date: inception_date.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: Option<&str>, date: Option<&str>) -> FundCreateRequest {
        FundCreateRequest {
            name: name.map(str::to_string),
            inception_date: date.map(str::to_string),
        }
    }

    #[test]
    fn accepts_well_formed_request() {
        let valid = validate(&request(Some("Fund A"), Some("2024-01-01"))).unwrap();
        assert_eq!(valid.name, "Fund A");
        assert_eq!(valid.inception_date, "2024-01-01");
    }

    #[test]
    fn rejects_empty_name() {
        let err = validate(&request(Some(""), Some("2024-01-01"))).unwrap_err();
        assert_eq!(err.field, "name");

        let err = validate(&request(Some("   "), Some("2024-01-01"))).unwrap_err();
        assert_eq!(err.field, "name");
    }

    #[test]
    fn rejects_missing_name() {
        let err = validate(&request(None, Some("2024-01-01"))).unwrap_err();
        assert_eq!(err, ValidationError::new("name", "is required"));
    }

    #[test]
    fn rejects_unparseable_date() {
        let err = validate(&request(Some("A"), Some("not-a-date"))).unwrap_err();
        assert_eq!(err.field, "inceptionDate");
    }

    #[test]
    fn rejects_impossible_and_reformatted_dates() {
        for date in [
            "2024-02-30",
            "2023-13-01",
            "01/02/2024",
            "2024-01-01T00:00:00Z",
            "2024-1-5",
            "2024-01-1",
            "+2024-01-01",
        ] {
            let err = validate(&request(Some("A"), Some(date))).unwrap_err();
            assert_eq!(err.field, "inceptionDate", "accepted {date}");
        }
    }

    #[test]
    fn accepts_leap_day() {
        assert!(validate(&request(Some("A"), Some("2024-02-29"))).is_ok());
    }

    #[test]
    fn rejects_missing_date() {
        let err = validate(&request(Some("A"), None)).unwrap_err();
        assert_eq!(err, ValidationError::new("inceptionDate", "is required"));
    }

    #[test]
    fn name_is_checked_before_date() {
        let err = validate(&request(Some(""), Some("garbage"))).unwrap_err();
        assert_eq!(err.field, "name");
    }
}
