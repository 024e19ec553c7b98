// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity record and its on-disk wallet format.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Identity type tag written to the wallet file.
pub const X509_IDENTITY_TYPE: &str = "X.509";

/// The application identity: label, membership id, certificate and key.
///
/// Immutable once built. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct Identity {
    label: String,
    msp_id: String,
    certificate: Vec<u8>,
    private_key: Vec<u8>,
}

impl Identity {
    pub fn new(
        label: impl Into<String>,
        msp_id: impl Into<String>,
        certificate: Vec<u8>,
        private_key: Vec<u8>,
    ) -> Self {
        Self {
            label: label.into(),
            msp_id: msp_id.into(),
            certificate,
            private_key,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn msp_id(&self) -> &str {
        &self.msp_id
    }

    /// PEM-encoded X.509 certificate.
    pub fn certificate(&self) -> &[u8] {
        &self.certificate
    }

    /// PEM-encoded private key.
    pub fn private_key(&self) -> &[u8] {
        &self.private_key
    }

    /// Hex SHA-256 of the certificate PEM, safe to log.
    pub fn fingerprint(&self) -> String {
        hex::encode(Sha256::digest(&self.certificate))
    }

    pub(crate) fn to_record(&self) -> IdentityRecord {
        IdentityRecord {
            version: 1,
            msp_id: self.msp_id.clone(),
            identity_type: X509_IDENTITY_TYPE.to_string(),
            credentials: Credentials {
                certificate: String::from_utf8_lossy(&self.certificate).into_owned(),
                private_key: String::from_utf8_lossy(&self.private_key).into_owned(),
            },
        }
    }

    pub(crate) fn from_record(label: &str, record: IdentityRecord) -> Self {
        Self::new(
            label,
            record.msp_id,
            record.credentials.certificate.into_bytes(),
            record.credentials.private_key.into_bytes(),
        )
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("label", &self.label)
            .field("msp_id", &self.msp_id)
            .field("fingerprint", &self.fingerprint())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Wallet file contents (`<label>.id`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct IdentityRecord {
    pub version: u32,
    #[serde(rename = "mspId")]
    pub msp_id: String,
    #[serde(rename = "type")]
    pub identity_type: String,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Credentials {
    pub certificate: String,
    #[serde(rename = "privateKey")]
    pub private_key: String,
}
