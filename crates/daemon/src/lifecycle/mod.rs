// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: startup and shutdown.

mod startup;
pub use startup::startup;

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use nb_storage::SnapshotJobStore;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/nb)
    pub state_dir: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to version file
    pub version_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the job snapshot
    pub snapshot_path: PathBuf,
    /// TCP address to bind
    pub listen_addr: String,
    pub auth_token: Option<String>,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// Uses fixed paths under `~/.local/state/nb/` (or `$NB_STATE_DIR`).
    pub fn load() -> Result<Self, LifecycleError> {
        let mut config = Self::for_state_dir(crate::env::state_dir()?, crate::env::listen_addr());
        config.auth_token = crate::env::auth_token();
        Ok(config)
    }

    pub fn for_state_dir(state_dir: PathBuf, listen_addr: impl Into<String>) -> Self {
        Self {
            lock_path: state_dir.join("daemon.pid"),
            version_path: state_dir.join("daemon.version"),
            log_path: state_dir.join("daemon.log"),
            snapshot_path: state_dir.join("jobs.json"),
            listen_addr: listen_addr.into(),
            auth_token: None,
            state_dir,
        }
    }
}

/// Daemon state during operation.
pub struct DaemonState {
    pub config: Config,
    // NOTE(lifetime): Held to maintain exclusive file lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
    pub store: Arc<SnapshotJobStore>,
    /// Bound listener, handed to [`crate::Listener`]
    pub listener: Option<TcpListener>,
    pub start_time: Instant,
}

impl DaemonState {
    /// Remove the PID and version files. The lock is released when `self`
    /// is dropped.
    pub fn shutdown(&mut self) -> Result<(), LifecycleError> {
        info!("Shutting down daemon...");
        for path in [&self.config.lock_path, &self.config.version_path] {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "failed to remove state file");
                }
            }
        }
        info!("Daemon shutdown complete");
        Ok(())
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Could not determine state directory")]
    NoStateDir,

    #[error("Failed to acquire lock: daemon already running?")]
    LockFailed(#[source] std::io::Error),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, std::io::Error),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] nb_storage::SnapshotError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
