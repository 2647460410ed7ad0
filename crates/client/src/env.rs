// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for daemon clients.

use std::time::Duration;

/// Address used when `NB_DAEMON_ADDR` is unset
pub const DEFAULT_DAEMON_ADDR: &str = "127.0.0.1:7717";

/// Daemon endpoint: NB_DAEMON_ADDR > 127.0.0.1:7717
pub fn daemon_addr() -> String {
    std::env::var("NB_DAEMON_ADDR")
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DAEMON_ADDR.to_string())
}

/// Token presented in the Hello handshake.
pub fn auth_token() -> Option<String> {
    std::env::var("NB_AUTH_TOKEN").ok().filter(|s| !s.is_empty())
}

/// Per-message IPC timeout
pub fn ipc_timeout() -> Duration {
    std::env::var("NB_IPC_TIMEOUT_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(5))
}

/// Interval between job fetches while waiting
pub fn wait_poll_interval() -> Duration {
    std::env::var("NB_WAIT_POLL_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(Duration::from_secs(3))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
