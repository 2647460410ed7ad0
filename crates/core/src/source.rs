// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Source files attached to build requests.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// One generated source file, addressed by its path relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: String,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self { path: path.into(), content: content.into() }
    }

    pub fn is_swift(&self) -> bool {
        self.path.ends_with(".swift")
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// First path component, or `None` for files at the root.
    pub fn top_dir(&self) -> Option<&str> {
        self.path.split_once('/').map(|(dir, _)| dir)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileSetError {
    #[error("empty file path")]
    EmptyPath,

    #[error("path must be relative: {0}")]
    Absolute(String),

    #[error("path escapes the project root: {0}")]
    Traversal(String),

    #[error("duplicate file path: {0}")]
    Duplicate(String),
}

/// Normalize a relative file path: backslashes become `/`, a leading `./` is
/// dropped, and absolute or escaping paths are rejected.
pub fn normalize_path(path: &str) -> Result<String, FileSetError> {
    let unified = path.trim().replace('\\', "/");
    let trimmed = unified.trim_start_matches("./");
    if trimmed.is_empty() {
        return Err(FileSetError::EmptyPath);
    }
    if trimmed.starts_with('/') {
        return Err(FileSetError::Absolute(path.to_string()));
    }
    let mut segments = Vec::new();
    for segment in trimmed.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return Err(FileSetError::Traversal(path.to_string())),
            s => segments.push(s),
        }
    }
    if segments.is_empty() {
        return Err(FileSetError::EmptyPath);
    }
    Ok(segments.join("/"))
}

/// Normalize every path in a file set and reject duplicates.
///
/// Returns the file set with normalized paths, in input order.
pub fn validate_file_set(files: &[SourceFile]) -> Result<Vec<SourceFile>, FileSetError> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(files.len());
    for file in files {
        let path = normalize_path(&file.path)?;
        if !seen.insert(path.clone()) {
            return Err(FileSetError::Duplicate(path));
        }
        out.push(SourceFile { path, content: file.content.clone() });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "source_tests.rs"]
mod tests;
