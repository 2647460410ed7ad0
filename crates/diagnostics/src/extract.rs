// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic line shape: `path:line[:col]: error: message`.

use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Most compiler errors kept from one build.
pub const DEFAULT_ERROR_CAP: usize = 50;

#[allow(clippy::expect_used)]
static LOCATION_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[^:\n]*?:\d+(?::\d+)?:\s*)?(?:fatal error|error|warning|note):\s*")
        .expect("constant regex pattern is valid")
});

#[allow(clippy::expect_used)]
static ERROR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^:\n]+:\d+(?::\d+)?:\s*(?:fatal )?error:\s*\S").expect("constant regex pattern is valid")
});

/// Strip a leading `path:line[:col]: error|warning|note:` and trim.
///
/// Lines without the prefix are only trimmed.
pub fn normalize(line: &str) -> String {
    LOCATION_PREFIX.replace(line, "").trim().to_string()
}

/// Error lines from compiler output, trimmed, deduplicated in first-seen
/// order and capped at `cap`.
pub fn extract_errors(output: &str, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| ERROR_LINE.is_match(line))
        .filter(|line| seen.insert(*line))
        .take(cap)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
