// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runner configuration: defaults, then an optional TOML file, then the
//! environment.
//!
//! ```toml
//! runner_id = "mac-mini-1"
//! poll_ms = 5000
//! log_flush_ms = 2000
//! build_timeout_secs = 1800
//! xcodebuild = "/Applications/Xcode-16.app/Contents/Developer/usr/bin/xcodebuild"
//! max_compiler_errors = 50
//! ```

use crate::env;
use nb_diagnostics::DEFAULT_ERROR_CAP;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_LOG_FLUSH_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_BUILD_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid runner config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// On-disk shape; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    runner_id: Option<String>,
    #[serde(default)]
    poll_ms: Option<u64>,
    #[serde(default)]
    log_flush_ms: Option<u64>,
    #[serde(default)]
    build_timeout_secs: Option<u64>,
    #[serde(default)]
    xcodebuild: Option<PathBuf>,
    #[serde(default)]
    max_compiler_errors: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerConfig {
    pub runner_id: String,
    pub poll_interval: Duration,
    pub log_flush_interval: Duration,
    pub build_timeout: Duration,
    /// Explicit compiler path; searched for when unset.
    pub xcodebuild: Option<PathBuf>,
    pub max_compiler_errors: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            runner_id: format!("runner-{}", std::process::id()),
            poll_interval: DEFAULT_POLL_INTERVAL,
            log_flush_interval: DEFAULT_LOG_FLUSH_INTERVAL,
            build_timeout: DEFAULT_BUILD_TIMEOUT,
            xcodebuild: None,
            max_compiler_errors: DEFAULT_ERROR_CAP,
        }
    }
}

impl RunnerConfig {
    nb_core::setters! {
        into {
            runner_id: String,
        }
        set {
            poll_interval: Duration,
            log_flush_interval: Duration,
            build_timeout: Duration,
            max_compiler_errors: usize,
        }
        option {
            xcodebuild: PathBuf,
        }
    }

    /// Load from `NB_RUNNER_CONFIG` or `~/.config/nb/runner.toml`, then apply
    /// environment overrides. A missing default file is not an error; a
    /// missing explicit file is.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::config_path() {
            Some(path) => Self::from_file(&path)?,
            None => match default_config_path().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_env();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        let file: FileConfig = toml::from_str(text)?;
        let mut config = Self::default();
        if let Some(id) = file.runner_id {
            config.runner_id = id;
        }
        if let Some(ms) = file.poll_ms {
            config.poll_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = file.log_flush_ms {
            config.log_flush_interval = Duration::from_millis(ms);
        }
        if let Some(secs) = file.build_timeout_secs {
            config.build_timeout = Duration::from_secs(secs);
        }
        if file.xcodebuild.is_some() {
            config.xcodebuild = file.xcodebuild;
        }
        if let Some(cap) = file.max_compiler_errors {
            config.max_compiler_errors = cap;
        }
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(id) = env::runner_id() {
            self.runner_id = id;
        }
        if let Some(interval) = env::poll_interval() {
            self.poll_interval = interval;
        }
        if let Some(interval) = env::log_flush_interval() {
            self.log_flush_interval = interval;
        }
        if let Some(timeout) = env::build_timeout() {
            self.build_timeout = timeout;
        }
        if let Some(path) = env::xcodebuild() {
            self.xcodebuild = Some(path);
        }
        if let Some(cap) = env::max_compiler_errors() {
            self.max_compiler_errors = cap;
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("nb").join("runner.toml"))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
