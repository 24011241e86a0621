// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::net::SocketAddr;

use portfolio_backend::{
    api::{router, RouterSettings},
    config::Config,
    error::StartupError,
    state::AppState,
    telemetry,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not installed yet; the log format comes from this config.
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };
    telemetry::init_tracing(config.log_format);

    if let Err(e) = run(config).await {
        error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), StartupError> {
    let state = AppState::from_config(&config)?;
    let settings = RouterSettings::from_config(&config)?;
    let app = router(state, &settings);

    let listener = TcpListener::bind(config.bind_address()).await?;
    info!(
        address = %listener.local_addr()?,
        docs = settings.expose_docs,
        "portfolio backend listening"
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
