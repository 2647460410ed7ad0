// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Locating the native compiler.

use std::path::{Path, PathBuf};
use thiserror::Error;

const BINARY: &str = "xcodebuild";

/// Well-known install locations, checked after any explicit path.
pub const STANDARD_LOCATIONS: &[&str] =
    &["/usr/bin/xcodebuild", "/Applications/Xcode.app/Contents/Developer/usr/bin/xcodebuild"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("xcodebuild not found (searched: {})", .searched.join(", "))]
pub struct ToolchainNotFound {
    pub searched: Vec<String>,
}

/// Find `xcodebuild`: the explicit path, the standard locations, then each
/// `PATH` entry. The error lists every place that was looked at.
pub fn locate_xcodebuild(explicit: Option<&Path>) -> Result<PathBuf, ToolchainNotFound> {
    let path_var = std::env::var_os("PATH").unwrap_or_default();
    let path_dirs: Vec<PathBuf> = std::env::split_paths(&path_var).collect();
    locate_in(explicit, STANDARD_LOCATIONS, &path_dirs)
}

fn locate_in(
    explicit: Option<&Path>,
    standard: &[&str],
    path_dirs: &[PathBuf],
) -> Result<PathBuf, ToolchainNotFound> {
    let candidates = explicit
        .map(Path::to_path_buf)
        .into_iter()
        .chain(standard.iter().map(PathBuf::from))
        .chain(path_dirs.iter().map(|dir| dir.join(BINARY)));

    let mut searched = Vec::new();
    for candidate in candidates {
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "found xcodebuild");
            return Ok(candidate);
        }
        searched.push(candidate.display().to_string());
    }
    Err(ToolchainNotFound { searched })
}

#[cfg(test)]
#[path = "toolchain_tests.rs"]
mod tests;
