// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session establishment against the ledger network.
//!
//! Connecting is expensive (discovery, TLS handshakes) and happens once at
//! startup. The resulting [`Session`] is shared read-only by every request
//! handler and released exactly once on shutdown.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use super::client::{ClientSetupError, PeerClient};
use super::gateway::{Contract, TransactionGateway};
use super::profile::{ConnectionProfile, ProfileError};
use crate::identity::{Identity, IdentityStore, IdentityStoreError};

/// The network could not be reached or the session could not be set up.
#[derive(Debug, Error)]
pub enum ConnectivityError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error("identity `{label}` unavailable: {source}")]
    Identity {
        label: String,
        #[source]
        source: IdentityStoreError,
    },

    #[error(transparent)]
    Client(#[from] ClientSetupError),

    #[error("discovery failed on every peer: {0}")]
    Discovery(String),
}

/// The network answered but does not host what was asked for.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("channel `{0}` not found")]
    ChannelNotFound(String),

    #[error("contract `{contract}` not found on channel `{channel}`")]
    ContractNotFound { channel: String, contract: String },
}

#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("connectivity error: {0}")]
    Connectivity(#[from] ConnectivityError),

    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

impl From<ProfileError> for ConnectorError {
    fn from(err: ProfileError) -> Self {
        ConnectorError::Connectivity(err.into())
    }
}

impl From<ClientSetupError> for ConnectorError {
    fn from(err: ClientSetupError) -> Self {
        ConnectorError::Connectivity(err.into())
    }
}

/// Live connection bound to one identity, channel and contract.
pub struct Session {
    identity: Identity,
    channel_name: String,
    contract_name: String,
    contract: Arc<dyn Contract>,
    closed: bool,
}

impl Session {
    pub fn new(
        identity: Identity,
        channel_name: impl Into<String>,
        contract: Arc<dyn Contract>,
    ) -> Self {
        Self {
            identity,
            channel_name: channel_name.into(),
            contract_name: contract.name().to_string(),
            contract,
            closed: false,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn channel_name(&self) -> &str {
        &self.channel_name
    }

    pub fn contract_name(&self) -> &str {
        &self.contract_name
    }

    /// Gateway over this session's contract. `timeout` caps every call.
    pub fn gateway(&self, timeout: Duration) -> TransactionGateway {
        TransactionGateway::new(self.contract.clone(), self.channel_name.clone(), timeout)
    }

    /// Release the connection.
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.contract.close();
        info!(
            channel = %self.channel_name,
            contract = %self.contract_name,
            "Ledger session closed"
        );
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("identity", &self.identity)
            .field("channel_name", &self.channel_name)
            .field("contract_name", &self.contract_name)
            .field("closed", &self.closed)
            .finish()
    }
}

/// Opens sessions using identities from the wallet.
pub struct LedgerConnector<'a> {
    store: &'a IdentityStore,
    discovery_as_localhost: bool,
    request_timeout: Duration,
}

impl<'a> LedgerConnector<'a> {
    pub fn new(store: &'a IdentityStore, discovery_as_localhost: bool, request_timeout: Duration) -> Self {
        Self {
            store,
            discovery_as_localhost,
            request_timeout,
        }
    }

    /// Establish a session and resolve `channel_name`/`contract_name`.
    ///
    /// Peers are tried in profile order; the first one that answers
    /// discovery is used.
    pub async fn connect(
        &self,
        profile_path: impl AsRef<Path>,
        identity_label: &str,
        channel_name: &str,
        contract_name: &str,
    ) -> Result<Session, ConnectorError> {
        let profile = ConnectionProfile::load(profile_path)?;
        let identity = self
            .store
            .get(identity_label)
            .map_err(|source| ConnectivityError::Identity {
                label: identity_label.to_string(),
                source,
            })?;

        if let Some(msp_id) = profile.client_msp_id() {
            if msp_id != identity.msp_id() {
                warn!(
                    profile_msp_id = msp_id,
                    identity_msp_id = identity.msp_id(),
                    "Identity belongs to a different organization than the profile client"
                );
            }
        }

        let mut failures = Vec::new();
        for endpoint in profile.endpoints(self.discovery_as_localhost)? {
            let client = PeerClient::new(&endpoint, &identity, self.request_timeout)?;
            let discovered = match client.discover().await {
                Ok(discovered) => discovered,
                Err(e) => {
                    warn!(peer = %endpoint.name, url = %endpoint.url, error = %e, "Peer discovery failed");
                    failures.push(format!("{}: {e}", endpoint.name));
                    continue;
                }
            };

            let channel = discovered
                .channels
                .iter()
                .find(|c| c.name == channel_name)
                .ok_or_else(|| ResolutionError::ChannelNotFound(channel_name.to_string()))?;
            if !channel.contracts.iter().any(|c| c == contract_name) {
                return Err(ResolutionError::ContractNotFound {
                    channel: channel_name.to_string(),
                    contract: contract_name.to_string(),
                }
                .into());
            }

            let contract = client.into_contract(channel_name, contract_name);
            info!(
                peer = contract.peer(),
                channel = contract.channel(),
                contract = contract.name(),
                identity = identity_label,
                fingerprint = %identity.fingerprint(),
                "Ledger session established"
            );
            return Ok(Session::new(identity, channel_name, Arc::new(contract)));
        }

        Err(ConnectivityError::Discovery(failures.join("; ")).into())
    }
}
