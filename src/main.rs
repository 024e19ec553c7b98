// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fund_admin_gateway::{
    api::router,
    config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER},
    error::StartupError,
    identity::{CredentialSource, IdentityProvisioner, IdentityStore},
    ledger::LedgerConnector,
    state::AppState,
};

/// In-flight requests get this long to finish after a shutdown signal.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Logging is configured from the same environment; report directly.
            eprintln!("fund-admin-gateway: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        error!(error = %e, "Fund admin gateway failed");
        std::process::exit(1);
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(true).with_level(true))
            .init(),
    }
}

async fn run(config: AppConfig) -> Result<(), StartupError> {
    // Install the ring crypto provider for rustls (must be done before any TLS operations).
    // A second install only fails when a provider is already present.
    let _ = rustls::crypto::ring::default_provider().install_default();

    let store = IdentityStore::open(&config.wallet_dir)?;
    info!(wallet = %store.root().display(), "Opened identity wallet");

    let source = CredentialSource::new(&config.credential_dir);
    IdentityProvisioner::new(&store, source, config.msp_id.clone())
        .ensure(&config.identity_label)?;

    let session = LedgerConnector::new(&store, config.discovery_as_localhost, config.ledger_timeout)
        .connect(
            &config.connection_profile,
            &config.identity_label,
            &config.channel_name,
            &config.contract_name,
        )
        .await?;

    let state =
        AppState::new(session.gateway(config.ledger_timeout)).with_wallet_dir(&config.wallet_dir);
    let app = router(state);

    let shutdown = CancellationToken::new();
    let handle = Handle::new();
    tokio::spawn(watch_signals(shutdown.clone()));
    {
        let handle = handle.clone();
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            shutdown.cancelled().await;
            info!(grace_secs = SHUTDOWN_GRACE.as_secs(), "Shutting down HTTP server");
            handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });
    }

    let served = match &config.tls {
        Some((cert, key)) => {
            let tls = RustlsConfig::from_pem_file(cert, key).await?;
            info!(addr = %config.bind_addr, "Fund admin gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(config.bind_addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
        None => {
            info!(addr = %config.bind_addr, "Fund admin gateway listening on http (docs at /docs)");
            axum_server::bind(config.bind_addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await
        }
    };

    // Release the session whether the server stopped cleanly or not.
    shutdown.cancel();
    session.close();

    served.map_err(StartupError::from)
}

/// Cancel `shutdown` on ctrl-c or SIGTERM.
async fn watch_signals(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c"),
        _ = terminate => info!("Received SIGTERM"),
        _ = shutdown.cancelled() => return,
    }
    shutdown.cancel();
}
