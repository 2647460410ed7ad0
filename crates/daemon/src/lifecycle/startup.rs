// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;
use std::sync::Arc;
use std::time::Instant;

use fs2::FileExt;
use nb_storage::{JobStore, SnapshotJobStore};
use tokio::net::TcpListener;
use tracing::info;

use super::{Config, DaemonState, LifecycleError};

/// Start the daemon
pub async fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    match startup_inner(config).await {
        Ok(state) => Ok(state),
        Err(e) => {
            // Lock failures leave the files alone:
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

async fn startup_inner(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Create state directory
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire lock file FIRST - prevents races
    // Open without truncating so a running daemon's PID survives a failed attempt.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file;

    std::fs::write(&config.version_path, crate::env::DAEMON_VERSION)?;

    // 3. Load jobs from the snapshot (if any)
    let store = SnapshotJobStore::open(&config.snapshot_path)?;
    let jobs = store.list().await.map(|jobs| jobs.len()).unwrap_or_default();
    info!(jobs, snapshot = %config.snapshot_path.display(), "recovered job store");

    // 4. Bind (LAST - only after all validation passes)
    let listener = TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| LifecycleError::BindFailed(config.listen_addr.clone(), e))?;

    Ok(DaemonState {
        config: config.clone(),
        lock_file,
        store: Arc::new(store),
        listener: Some(listener),
        start_time: Instant::now(),
    })
}

fn cleanup_on_failure(config: &Config) {
    let _ = std::fs::remove_file(&config.lock_path);
    let _ = std::fs::remove_file(&config.version_path);
}
