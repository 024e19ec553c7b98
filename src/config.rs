// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup into an [`AppConfig`].
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `WALLET_DIR` | Directory of the identity wallet | `wallet` |
//! | `CREDENTIAL_DIR` | MSP directory holding `signcerts/` and `keystore/` | test-network User1 MSP |
//! | `MSP_ID` | Organizational membership id of the identity | `Org1MSP` |
//! | `IDENTITY_LABEL` | Wallet label of the application identity | `appUser` |
//! | `CONNECTION_PROFILE` | Path to the JSON connection profile | test-network Org1 profile |
//! | `CHANNEL_NAME` | Channel hosting the contract | `mychannel` |
//! | `CONTRACT_NAME` | Contract invoked by the API | `admin` |
//! | `LEDGER_TIMEOUT_SECS` | Upper bound for a single submit/evaluate | `30` |
//! | `DISCOVERY_AS_LOCALHOST` | Rewrite peer hosts to `localhost` | `true` |
//! | `TLS_CERT_PATH` / `TLS_KEY_PATH` | Serve HTTPS with these PEM files (both or neither) | unset (HTTP) |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable name for the identity wallet directory.
///
/// Identities are stored as `<label>.id` JSON documents in this directory.
pub const WALLET_DIR_ENV: &str = "WALLET_DIR";

/// Environment variable name for the credential (MSP) directory used to
/// populate the wallet on first start.
pub const CREDENTIAL_DIR_ENV: &str = "CREDENTIAL_DIR";

pub const MSP_ID_ENV: &str = "MSP_ID";
pub const IDENTITY_LABEL_ENV: &str = "IDENTITY_LABEL";
pub const CONNECTION_PROFILE_ENV: &str = "CONNECTION_PROFILE";
pub const CHANNEL_NAME_ENV: &str = "CHANNEL_NAME";
pub const CONTRACT_NAME_ENV: &str = "CONTRACT_NAME";
pub const LEDGER_TIMEOUT_ENV: &str = "LEDGER_TIMEOUT_SECS";

/// When set to `true`, peer hostnames from the connection profile are
/// rewritten to `localhost`. Required when the network runs in local
/// containers whose hostnames do not resolve from the host.
pub const DISCOVERY_AS_LOCALHOST_ENV: &str = "DISCOVERY_AS_LOCALHOST";

pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_WALLET_DIR: &str = "wallet";
pub const DEFAULT_MSP_ID: &str = "Org1MSP";
pub const DEFAULT_IDENTITY_LABEL: &str = "appUser";
pub const DEFAULT_CHANNEL_NAME: &str = "mychannel";
pub const DEFAULT_CONTRACT_NAME: &str = "admin";
pub const DEFAULT_LEDGER_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Org1 directory of the sample test network, relative to the working directory.
const TEST_NETWORK_ORG1: &str =
    "../../../fabric-samples/test-network/organizations/peerOrganizations/org1.example.com";

/// Configuration errors are fatal: the process never binds with a half-read config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value `{value}`")]
    InvalidValue { var: &'static str, value: String },

    #[error("{set} is set but {missing} is not")]
    Incomplete {
        set: &'static str,
        missing: &'static str,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub wallet_dir: PathBuf,
    pub credential_dir: PathBuf,
    pub msp_id: String,
    pub identity_label: String,
    pub connection_profile: PathBuf,
    pub channel_name: String,
    pub contract_name: String,
    pub ledger_timeout: Duration,
    pub discovery_as_localhost: bool,
    /// Certificate and key PEM paths; both must be set to serve HTTPS.
    pub tls: Option<(PathBuf, PathBuf)>,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = get(HOST_ENV, DEFAULT_HOST);
        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidValue {
                var: PORT_ENV,
                value: raw,
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    var: HOST_ENV,
                    value: host.clone(),
                })?;

        let ledger_timeout = match lookup(LEDGER_TIMEOUT_ENV) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: LEDGER_TIMEOUT_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_LEDGER_TIMEOUT,
        };

        let discovery_as_localhost = match lookup(DISCOVERY_AS_LOCALHOST_ENV) {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::InvalidValue {
                var: DISCOVERY_AS_LOCALHOST_ENV,
                value: raw,
            })?,
            None => true,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some((PathBuf::from(cert), PathBuf::from(key))),
            (Some(_), None) => {
                return Err(ConfigError::Incomplete {
                    set: TLS_CERT_PATH_ENV,
                    missing: TLS_KEY_PATH_ENV,
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Incomplete {
                    set: TLS_KEY_PATH_ENV,
                    missing: TLS_CERT_PATH_ENV,
                })
            }
            (None, None) => None,
        };

        Ok(Self {
            bind_addr,
            wallet_dir: PathBuf::from(get(WALLET_DIR_ENV, DEFAULT_WALLET_DIR)),
            credential_dir: PathBuf::from(get(
                CREDENTIAL_DIR_ENV,
                &format!("{TEST_NETWORK_ORG1}/users/User1@org1.example.com/msp"),
            )),
            msp_id: get(MSP_ID_ENV, DEFAULT_MSP_ID),
            identity_label: get(IDENTITY_LABEL_ENV, DEFAULT_IDENTITY_LABEL),
            connection_profile: PathBuf::from(get(
                CONNECTION_PROFILE_ENV,
                &format!("{TEST_NETWORK_ORG1}/connection-org1.json"),
            )),
            channel_name: get(CHANNEL_NAME_ENV, DEFAULT_CHANNEL_NAME),
            contract_name: get(CONTRACT_NAME_ENV, DEFAULT_CONTRACT_NAME),
            ledger_timeout,
            discovery_as_localhost,
            tls,
            log_format,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_match_sample_network() {
        let config = load(&[]).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.msp_id, "Org1MSP");
        assert_eq!(config.identity_label, "appUser");
        assert_eq!(config.channel_name, "mychannel");
        assert_eq!(config.contract_name, "admin");
        assert_eq!(config.ledger_timeout, Duration::from_secs(30));
        assert!(config.discovery_as_localhost);
        assert!(config.tls.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config
            .connection_profile
            .ends_with("org1.example.com/connection-org1.json"));
    }

    #[test]
    fn overrides_are_applied() {
        let config = load(&[
            ("PORT", "9000"),
            ("CHANNEL_NAME", "funds"),
            ("LEDGER_TIMEOUT_SECS", "5"),
            ("DISCOVERY_AS_LOCALHOST", "false"),
            ("LOG_FORMAT", "json"),
            ("TLS_CERT_PATH", "/tls/cert.pem"),
            ("TLS_KEY_PATH", "/tls/key.pem"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.channel_name, "funds");
        assert_eq!(config.ledger_timeout, Duration::from_secs(5));
        assert!(!config.discovery_as_localhost);
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(config.tls.is_some());
    }

    #[test]
    fn tls_requires_both_paths() {
        assert!(matches!(
            load(&[("TLS_CERT_PATH", "/tls/cert.pem")]),
            Err(ConfigError::Incomplete {
                set: TLS_CERT_PATH_ENV,
                missing: TLS_KEY_PATH_ENV,
            })
        ));
        let err = load(&[("TLS_KEY_PATH", "/tls/key.pem")]).unwrap_err();
        assert_eq!(err.to_string(), "TLS_KEY_PATH is set but TLS_CERT_PATH is not");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        assert!(matches!(
            load(&[("PORT", "http")]),
            Err(ConfigError::InvalidValue { var: PORT_ENV, .. })
        ));
        assert!(matches!(
            load(&[("LEDGER_TIMEOUT_SECS", "0")]),
            Err(ConfigError::InvalidValue {
                var: LEDGER_TIMEOUT_ENV,
                ..
            })
        ));
        assert!(load(&[("DISCOVERY_AS_LOCALHOST", "maybe")]).is_err());
    }
}
