// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use fintrack_server::api::router;
use fintrack_server::auth::TokenKeys;
use fintrack_server::config::Config;
use fintrack_server::state::AppState;
use fintrack_server::storage::{DocumentStorage, StoragePaths};

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Missing JWT_SECRET or DATA_DIR is fatal here, before the listener
    // binds, never a per-request error later.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_json);

    let mut storage = DocumentStorage::new(StoragePaths::new(&config.data_dir));
    if let Err(e) = storage.initialize() {
        tracing::error!(error = %e, data_dir = %config.data_dir, "failed to initialize storage");
        std::process::exit(1);
    }

    let state = AppState::new(storage, TokenKeys::from_secret(config.jwt_secret.as_bytes()));
    let app = router(state, &config.cors_allowed_origins);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .expect("Failed to bind listener");

    tracing::info!(addr = %config.addr, "Fintrack server listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server failed");
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
