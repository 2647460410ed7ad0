// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access for the runner.
//!
//! Each accessor returns `None` when the variable is unset or unparsable so
//! [`crate::RunnerConfig`] can overlay only what the environment provides.

use std::path::PathBuf;
use std::time::Duration;

fn var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn millis(name: &str) -> Option<Duration> {
    var(name).and_then(|s| s.parse::<u64>().ok()).map(Duration::from_millis)
}

/// Explicit config file path (NB_RUNNER_CONFIG)
pub fn config_path() -> Option<PathBuf> {
    var("NB_RUNNER_CONFIG").map(PathBuf::from)
}

/// Runner identity recorded on claimed jobs (NB_RUNNER_ID)
pub fn runner_id() -> Option<String> {
    var("NB_RUNNER_ID")
}

/// Idle sleep between empty claims (NB_RUNNER_POLL_MS)
pub fn poll_interval() -> Option<Duration> {
    millis("NB_RUNNER_POLL_MS")
}

/// Minimum spacing between log flushes (NB_LOG_FLUSH_MS)
pub fn log_flush_interval() -> Option<Duration> {
    millis("NB_LOG_FLUSH_MS")
}

/// Hard per-build ceiling (NB_BUILD_TIMEOUT_SECS)
pub fn build_timeout() -> Option<Duration> {
    var("NB_BUILD_TIMEOUT_SECS").and_then(|s| s.parse::<u64>().ok()).map(Duration::from_secs)
}

/// Compiler binary override (NB_XCODEBUILD)
pub fn xcodebuild() -> Option<PathBuf> {
    var("NB_XCODEBUILD").map(PathBuf::from)
}

/// Cap on reported compiler errors (NB_MAX_COMPILER_ERRORS)
pub fn max_compiler_errors() -> Option<usize> {
    var("NB_MAX_COMPILER_ERRORS").and_then(|s| s.parse::<usize>().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
