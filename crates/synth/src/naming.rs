// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project name and bundle identifier normalization.
//!
//! Both inputs come straight from generated text, so neither is trusted.
//! Invalid values fall back to defaults instead of failing synthesis.

pub const DEFAULT_PROJECT_NAME: &str = "MyApp";
pub const DEFAULT_BUNDLE_ID: &str = "com.example.app";
pub const MAX_PROJECT_NAME_LEN: usize = 50;

/// Prefix added when a sanitized name would not start with a letter.
const LEADING_PREFIX: &str = "App";

/// Turn free text into a camel-case identifier usable as a target name.
///
/// `"my todo app"` becomes `"MyTodoApp"`, `"3D viewer"` becomes `"App3DViewer"`.
pub fn sanitize_project_name(input: &str) -> String {
    let cleaned: String =
        input.chars().filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace()).collect();

    let mut name = String::new();
    for word in cleaned.split_whitespace() {
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            name.push(first.to_ascii_uppercase());
            name.extend(chars);
        }
    }

    if name.is_empty() {
        return DEFAULT_PROJECT_NAME.to_string();
    }
    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        name.insert_str(0, LEADING_PREFIX);
    }
    name.truncate(MAX_PROJECT_NAME_LEN);
    name
}

/// Whether `id` has reverse-DNS shape: two or more dot-separated segments of
/// letters, digits and hyphens, each starting with a letter.
pub fn is_valid_bundle_id(id: &str) -> bool {
    let segments: Vec<&str> = id.split('.').collect();
    segments.len() >= 2
        && segments.iter().all(|segment| {
            segment.starts_with(|c: char| c.is_ascii_alphabetic())
                && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}

/// The trimmed bundle id, or [`DEFAULT_BUNDLE_ID`] when it is not valid.
pub fn bundle_id_or_default(id: &str) -> String {
    let id = id.trim();
    if is_valid_bundle_id(id) {
        id.to_string()
    } else {
        DEFAULT_BUNDLE_ID.to_string()
    }
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
