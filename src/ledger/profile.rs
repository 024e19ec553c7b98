// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Connection profile: the static description of the network topology.
//!
//! Only the parts the connector needs are modelled: the client's
//! organization, each organization's peers, and each peer's URL and TLS CA.
//! Peer URLs may use `grpcs://`/`grpc://` as in the usual profiles; they map
//! to the peers' `https://`/`http://` gateway endpoints on the same port.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read connection profile {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid connection profile: {0}")]
    Invalid(String),

    #[error("connection profile defines no peers")]
    NoPeers,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientSection {
    pub organization: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    pub mspid: String,
    #[serde(default)]
    pub peers: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TlsCaCerts {
    /// Inline PEM.
    pub pem: Option<String>,
    /// PEM file, relative to the profile's directory.
    pub path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeerConfig {
    pub url: String,
    #[serde(rename = "tlsCACerts", default)]
    pub tls_ca_certs: Option<TlsCaCerts>,
}

/// Parsed connection profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub client: ClientSection,
    #[serde(default)]
    pub organizations: BTreeMap<String, OrganizationConfig>,
    #[serde(default)]
    pub peers: BTreeMap<String, PeerConfig>,
    #[serde(skip)]
    base_dir: PathBuf,
}

/// A peer the connector may talk to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerEndpoint {
    pub name: String,
    pub url: Url,
    /// Extra trust anchor for the peer's TLS certificate.
    pub tls_ca_pem: Option<Vec<u8>>,
}

impl ConnectionProfile {
    /// Read and parse a JSON profile from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProfileError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ProfileError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut profile = Self::from_json(&raw)?;
        profile.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(profile)
    }

    pub fn from_json(raw: &str) -> Result<Self, ProfileError> {
        let profile: Self =
            serde_json::from_str(raw).map_err(|e| ProfileError::Invalid(e.to_string()))?;
        if profile.peers.is_empty() {
            return Err(ProfileError::NoPeers);
        }
        Ok(profile)
    }

    /// Peer names to try, client organization first.
    ///
    /// Falls back to every peer in the profile when the organization is
    /// missing or lists none.
    pub fn peer_names(&self) -> Vec<&str> {
        let org_peers: Vec<&str> = self
            .client
            .organization
            .as_ref()
            .and_then(|org| self.organizations.get(org))
            .map(|org| {
                org.peers
                    .iter()
                    .map(String::as_str)
                    .filter(|name| self.peers.contains_key(*name))
                    .collect()
            })
            .unwrap_or_default();

        if org_peers.is_empty() {
            self.peers.keys().map(String::as_str).collect()
        } else {
            org_peers
        }
    }

    /// MSP id of the client organization, if the profile names one.
    pub fn client_msp_id(&self) -> Option<&str> {
        self.client
            .organization
            .as_ref()
            .and_then(|org| self.organizations.get(org))
            .map(|org| org.mspid.as_str())
    }

    /// Resolve the endpoints of [`Self::peer_names`].
    ///
    /// With `as_localhost` every peer host becomes `localhost`.
    pub fn endpoints(&self, as_localhost: bool) -> Result<Vec<PeerEndpoint>, ProfileError> {
        self.peer_names()
            .into_iter()
            .map(|name| {
                let peer = &self.peers[name];
                Ok(PeerEndpoint {
                    name: name.to_string(),
                    url: gateway_url(&peer.url, as_localhost)?,
                    tls_ca_pem: self.tls_ca_pem(peer)?,
                })
            })
            .collect()
    }

    fn tls_ca_pem(&self, peer: &PeerConfig) -> Result<Option<Vec<u8>>, ProfileError> {
        let Some(tls) = &peer.tls_ca_certs else {
            return Ok(None);
        };
        if let Some(pem) = &tls.pem {
            return Ok(Some(pem.as_bytes().to_vec()));
        }
        if let Some(rel) = &tls.path {
            let path = self.base_dir.join(rel);
            let bytes = fs::read(&path).map_err(|source| ProfileError::Unreadable { path, source })?;
            return Ok(Some(bytes));
        }
        Ok(None)
    }
}

/// Map a profile peer URL to its HTTP gateway URL.
fn gateway_url(raw: &str, as_localhost: bool) -> Result<Url, ProfileError> {
    let parsed = Url::parse(raw).map_err(|e| ProfileError::Invalid(format!("peer url `{raw}`: {e}")))?;
    let scheme = match parsed.scheme() {
        "grpcs" | "https" => "https",
        "grpc" | "http" => "http",
        other => {
            return Err(ProfileError::Invalid(format!(
                "peer url `{raw}`: unsupported scheme `{other}`"
            )))
        }
    };
    let host = if as_localhost {
        "localhost"
    } else {
        parsed
            .host_str()
            .ok_or_else(|| ProfileError::Invalid(format!("peer url `{raw}` has no host")))?
    };
    let rebuilt = match parsed.port() {
        Some(port) => format!("{scheme}://{host}:{port}/"),
        None => format!("{scheme}://{host}/"),
    };
    Url::parse(&rebuilt).map_err(|e| ProfileError::Invalid(format!("peer url `{raw}`: {e}")))
}
