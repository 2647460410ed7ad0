// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-build scratch directories.

use nb_synth::PackageError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use thiserror::Error;

const PROJECT_EXT: &str = "xcodeproj";
/// How deep the recovery scan looks for a misplaced project.
const SCAN_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("project {expected} not found (found: {})", found_list(.found))]
pub struct ProjectNotFound {
    pub expected: String,
    pub found: Vec<String>,
}

fn found_list(found: &[String]) -> String {
    if found.is_empty() {
        "nothing".to_string()
    } else {
        found.join(", ")
    }
}

/// A temporary directory holding one extracted package. Removed on drop,
/// whichever way the build ends.
#[derive(Debug)]
pub struct Scratch {
    dir: TempDir,
}

impl Scratch {
    pub fn new() -> std::io::Result<Self> {
        let dir = tempfile::Builder::new().prefix("nb-build-").tempdir()?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Unpack a package archive into the scratch root.
    pub fn extract(&self, archive: &[u8]) -> Result<(), PackageError> {
        nb_synth::unpack(archive, self.path())
    }
}

/// Find `<project>.xcodeproj` under `root`.
///
/// When it is not at the top level, any other project bundle within a few
/// levels is used instead. With none anywhere, the error lists the top-level
/// entries that were extracted.
pub fn locate_project(root: &Path, project: &str) -> Result<PathBuf, ProjectNotFound> {
    let expected = format!("{project}.{PROJECT_EXT}");
    let direct = root.join(&expected);
    if direct.is_dir() {
        return Ok(direct);
    }

    let mut candidates = Vec::new();
    scan(root, SCAN_DEPTH, &mut candidates);
    candidates.sort();
    if let Some(found) = candidates.into_iter().next() {
        tracing::warn!(expected = %expected, found = %found.display(), "using project found by scan");
        return Ok(found);
    }

    let mut found: Vec<String> = std::fs::read_dir(root)
        .map(|entries| {
            entries.filter_map(Result::ok).map(|e| e.file_name().to_string_lossy().into_owned()).collect()
        })
        .unwrap_or_default();
    found.sort();
    Err(ProjectNotFound { expected, found })
}

fn scan(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.filter_map(Result::ok) {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if path.extension().is_some_and(|ext| ext == PROJECT_EXT) {
            out.push(path);
        } else if depth > 1 {
            scan(&path, depth - 1, out);
        }
    }
}

/// Remove `root` prefixes from compiler output so reported paths are
/// relative to the package. Both the path as given and its canonical form
/// are stripped (`/var` vs `/private/var` on macOS).
pub fn strip_scratch_prefix(text: &str, root: &Path) -> String {
    let mut prefixes = vec![root.to_path_buf()];
    if let Ok(canonical) = root.canonicalize() {
        if canonical != root {
            prefixes.push(canonical);
        }
    }
    // Longest first so a canonical path is not half-stripped by its alias
    prefixes.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));

    let mut out = text.to_string();
    for prefix in prefixes {
        let prefix = format!("{}/", prefix.display());
        out = out.replace(&prefix, "");
    }
    out
}

#[cfg(test)]
#[path = "scratch_tests.rs"]
mod tests;
