// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for a peer's transaction gateway endpoint.
//!
//! Every request carries the caller's MSP id, its certificate and an
//! ECDSA P-256/SHA-256 signature of the body made with the identity key:
//!
//! ```text
//! GET  /channels                                        -> discovery
//! POST /channels/{channel}/contracts/{contract}/submit   {"function":..,"args":[..]}
//! POST /channels/{channel}/contracts/{contract}/evaluate {"function":..,"args":[..]}
//! ```
//!
//! A contract refusal is a 400/404/409/422 answer with an `{"error": ..}`
//! body; any other failure status is the peer's, not the contract's.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use reqwest::{header::CONTENT_TYPE, StatusCode};
use ring::rand::SystemRandom;
use ring::signature::{EcdsaKeyPair, ECDSA_P256_SHA256_ASN1_SIGNING};
use serde::{Deserialize, Serialize};
use url::Url;

use super::gateway::{Contract, LedgerError};
use super::profile::PeerEndpoint;
use crate::identity::Identity;

pub const MSP_ID_HEADER: &str = "x-ledger-msp-id";
pub const CERTIFICATE_HEADER: &str = "x-ledger-certificate";
pub const SIGNATURE_HEADER: &str = "x-ledger-signature";

/// Longest error reason carried over from a peer response.
const MAX_REASON_LEN: usize = 200;

/// Body of a submit or evaluate request.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    pub args: Vec<String>,
}

/// Discovery answer: the channels this peer joined and their contracts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryResponse {
    pub channels: Vec<ChannelInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelInfo {
    pub name: String,
    #[serde(default)]
    pub contracts: Vec<String>,
}

#[derive(Deserialize)]
struct PeerErrorBody {
    #[serde(alias = "message")]
    error: String,
}

/// Errors building a client from an identity and endpoint.
#[derive(Debug, thiserror::Error)]
pub enum ClientSetupError {
    #[error("identity key is not a PKCS#8 P-256 key: {0}")]
    InvalidKey(String),

    #[error("invalid TLS CA certificate for {peer}: {reason}")]
    InvalidTlsCa { peer: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Http(String),
}

/// Signs request bodies with the identity's private key.
struct RequestSigner {
    key_pair: EcdsaKeyPair,
    rng: SystemRandom,
}

impl RequestSigner {
    fn from_pem(private_key_pem: &[u8]) -> Result<Self, ClientSetupError> {
        let parsed =
            pem::parse(private_key_pem).map_err(|e| ClientSetupError::InvalidKey(e.to_string()))?;
        if parsed.tag() != "PRIVATE KEY" {
            return Err(ClientSetupError::InvalidKey(format!(
                "unexpected PEM block `{}`",
                parsed.tag()
            )));
        }
        let rng = SystemRandom::new();
        let key_pair =
            EcdsaKeyPair::from_pkcs8(&ECDSA_P256_SHA256_ASN1_SIGNING, parsed.contents(), &rng)
                .map_err(|e| ClientSetupError::InvalidKey(e.to_string()))?;
        Ok(Self { key_pair, rng })
    }

    fn sign(&self, body: &[u8]) -> Result<String, LedgerError> {
        let signature = self
            .key_pair
            .sign(&self.rng, body)
            .map_err(|_| LedgerError::Peer("request signing failed".to_string()))?;
        Ok(Base64::encode_string(signature.as_ref()))
    }
}

/// Connection to one peer, authenticated as one identity.
pub struct PeerClient {
    peer: String,
    base_url: Url,
    http: reqwest::Client,
    signer: RequestSigner,
    msp_id: String,
    certificate_b64: String,
}

impl PeerClient {
    /// Build a client; no network traffic happens here.
    ///
    /// `timeout` bounds each HTTP exchange.
    pub fn new(
        endpoint: &PeerEndpoint,
        identity: &Identity,
        timeout: Duration,
    ) -> Result<Self, ClientSetupError> {
        let signer = RequestSigner::from_pem(identity.private_key())?;

        let mut builder = reqwest::Client::builder().timeout(timeout);
        if let Some(ca) = &endpoint.tls_ca_pem {
            let cert = reqwest::Certificate::from_pem(ca).map_err(|e| {
                ClientSetupError::InvalidTlsCa {
                    peer: endpoint.name.clone(),
                    reason: e.to_string(),
                }
            })?;
            builder = builder.add_root_certificate(cert);
        }
        let http = builder
            .build()
            .map_err(|e| ClientSetupError::Http(e.to_string()))?;

        Ok(Self {
            peer: endpoint.name.clone(),
            base_url: endpoint.url.clone(),
            http,
            signer,
            msp_id: identity.msp_id().to_string(),
            certificate_b64: Base64::encode_string(identity.certificate()),
        })
    }

    pub fn peer(&self) -> &str {
        &self.peer
    }

    /// Ask the peer which channels and contracts it serves.
    pub async fn discover(&self) -> Result<DiscoveryResponse, LedgerError> {
        let url = self.url(&["channels"])?;
        let response = self
            .http
            .get(url)
            .header(MSP_ID_HEADER, &self.msp_id)
            .header(CERTIFICATE_HEADER, &self.certificate_b64)
            .header(SIGNATURE_HEADER, self.signer.sign(b"")?)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(status, &body));
        }
        serde_json::from_slice(&body)
            .map_err(|e| LedgerError::Peer(format!("malformed discovery response: {e}")))
    }

    /// Bind this client to a resolved channel and contract.
    pub fn into_contract(self, channel: &str, contract: &str) -> LedgerContract {
        LedgerContract {
            client: self,
            channel: channel.to_string(),
            name: contract.to_string(),
            closed: AtomicBool::new(false),
        }
    }

    fn url(&self, segments: &[&str]) -> Result<Url, LedgerError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| LedgerError::Peer(format!("peer url {} is not a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn invoke(
        &self,
        channel: &str,
        contract: &str,
        action: &str,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError> {
        let url = self.url(&["channels", channel, "contracts", contract, action])?;
        let body = serde_json::to_vec(&InvokeRequest {
            function: function.to_string(),
            args: args.to_vec(),
        })
        .map_err(|e| LedgerError::Peer(format!("failed to encode request: {e}")))?;
        let signature = self.signer.sign(&body)?;

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(MSP_ID_HEADER, &self.msp_id)
            .header(CERTIFICATE_HEADER, &self.certificate_b64)
            .header(SIGNATURE_HEADER, signature)
            .body(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let payload = response.bytes().await.map_err(transport_error)?;
        if status.is_success() {
            Ok(payload.to_vec())
        } else {
            Err(status_error(status, &payload))
        }
    }
}

/// Contract handle backed by a [`PeerClient`].
pub struct LedgerContract {
    client: PeerClient,
    channel: String,
    name: String,
    closed: AtomicBool,
}

impl LedgerContract {
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn peer(&self) -> &str {
        self.client.peer()
    }

    fn ensure_open(&self) -> Result<(), LedgerError> {
        if self.closed.load(Ordering::Acquire) {
            Err(LedgerError::Unreachable("session closed".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Contract for LedgerContract {
    fn name(&self) -> &str {
        &self.name
    }

    async fn submit_transaction(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError> {
        self.ensure_open()?;
        self.client
            .invoke(&self.channel, &self.name, "submit", function, args)
            .await
    }

    async fn evaluate_transaction(
        &self,
        function: &str,
        args: &[String],
    ) -> Result<Vec<u8>, LedgerError> {
        self.ensure_open()?;
        self.client
            .invoke(&self.channel, &self.name, "evaluate", function, args)
            .await
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

fn transport_error(err: reqwest::Error) -> LedgerError {
    if err.is_timeout() {
        LedgerError::Timeout
    } else if err.is_connect() {
        LedgerError::Unreachable(err.to_string())
    } else {
        LedgerError::Peer(err.to_string())
    }
}

/// Classify a non-success peer response.
///
/// Only a refusal status carrying the peer's `{"error": ..}` body is the
/// contract saying no. 408/504 are timeouts. Authentication, throttling,
/// unknown routes and server errors are peer-side failures.
fn status_error(status: StatusCode, body: &[u8]) -> LedgerError {
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => LedgerError::Timeout,
        StatusCode::BAD_REQUEST
        | StatusCode::NOT_FOUND
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => match contract_error(body) {
            Some(reason) => LedgerError::Rejected(reason),
            None => peer_failure(status, body),
        },
        _ => peer_failure(status, body),
    }
}

/// Reason of a contract refusal, if `body` is one.
fn contract_error(body: &[u8]) -> Option<String> {
    let parsed = serde_json::from_slice::<PeerErrorBody>(body).ok()?;
    let reason = parsed.error.trim();
    (!reason.is_empty()).then(|| truncate_reason(reason))
}

fn peer_failure(status: StatusCode, body: &[u8]) -> LedgerError {
    LedgerError::Peer(format!("status {}: {}", status.as_u16(), error_reason(status, body)))
}

fn error_reason(status: StatusCode, body: &[u8]) -> String {
    if let Some(reason) = contract_error(body) {
        return reason;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    truncate_reason(text)
}

fn truncate_reason(reason: &str) -> String {
    match reason.char_indices().nth(MAX_REASON_LEN) {
        Some((cut, _)) => reason[..cut].to_string(),
        None => reason.to_string(),
    }
}
