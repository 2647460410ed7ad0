// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the daemon crate.

use std::path::PathBuf;
use std::time::Duration;

use crate::lifecycle::LifecycleError;

/// Daemon version reported in the Hello handshake
pub const DAEMON_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "+", env!("BUILD_GIT_HASH"));

/// Listen address used when `NB_DAEMON_ADDR` is unset
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:7717";

/// Resolve state directory: NB_STATE_DIR > XDG_STATE_HOME/nb > platform state dir/nb > ~/.local/state/nb
pub fn state_dir() -> Result<PathBuf, LifecycleError> {
    if let Ok(dir) = std::env::var("NB_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("nb"));
    }
    if let Some(dir) = dirs::state_dir() {
        return Ok(dir.join("nb"));
    }
    let home = dirs::home_dir().ok_or(LifecycleError::NoStateDir)?;
    Ok(home.join(".local/state/nb"))
}

/// TCP address to listen on (`NB_DAEMON_ADDR`).
pub fn listen_addr() -> String {
    std::env::var("NB_DAEMON_ADDR")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string())
}

/// Auth token for connections. When set, every client must present it in
/// the Hello handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("NB_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Default IPC timeout
pub fn ipc_timeout() -> Duration {
    std::env::var("NB_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Log filter directive: NB_LOG > RUST_LOG > "info"
pub fn log_filter() -> String {
    std::env::var("NB_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "info".to_string())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
