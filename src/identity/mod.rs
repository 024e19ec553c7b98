// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Application Identity
//!
//! The service talks to the ledger under exactly one identity: an X.509
//! certificate, its private key and the organization's MSP id.
//!
//! ## Storage Layout
//!
//! ```text
//! <wallet_dir>/
//!   appUser.id      # {"version":1,"mspId":..,"type":"X.509","credentials":{..}}
//!
//! <credential_dir>/          # read once, only when the wallet has no entry
//!   signcerts/cert.pem
//!   keystore/<exactly one key file>
//! ```

pub mod provisioner;
pub mod store;
pub mod types;

pub use provisioner::{CredentialSource, IdentityProvisioner, Provisioned, ProvisionError};
pub use store::{IdentityStore, IdentityStoreError};
pub use types::Identity;
