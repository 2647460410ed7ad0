// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nbd`: the build daemon.

use std::process::ExitCode;
use std::sync::Arc;

use nb_daemon::{startup, Config, ListenCtx, Listener};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    if std::env::args().nth(1).as_deref() == Some("--version") {
        println!("nbd {}", nb_daemon::env::DAEMON_VERSION);
        return ExitCode::SUCCESS;
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("nbd: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _guard = match nb_daemon::logging::init(&config.log_path) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("nbd: cannot open {}: {e}", config.log_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut daemon = match startup(&config).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!(error = %e, "startup failed");
            eprintln!("nbd: {e}");
            return ExitCode::FAILURE;
        }
    };
    let Some(tcp) = daemon.listener.take() else {
        return ExitCode::FAILURE;
    };
    let addr = tcp.local_addr().map(|a| a.to_string()).unwrap_or_else(|_| config.listen_addr.clone());
    if config.auth_token.is_none() && !addr.starts_with("127.") {
        tracing::warn!(%addr, "listening on a non-loopback address without NB_AUTH_TOKEN");
    }

    let ctx = Arc::new(ListenCtx::new(daemon.store.clone(), config.auth_token.clone()));
    let shutdown = CancellationToken::new();
    let listener = tokio::spawn(Listener::new(tcp, ctx).run(shutdown.clone()));

    info!(%addr, version = nb_daemon::env::DAEMON_VERSION, "daemon ready");
    println!("READY {addr}");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to wait for shutdown signal");
    }
    shutdown.cancel();
    let _ = listener.await;

    match daemon.shutdown() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "shutdown failed");
            ExitCode::FAILURE
        }
    }
}
