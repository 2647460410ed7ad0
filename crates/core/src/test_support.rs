// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BuildRequest, SourceFile};

// ── Proptest strategies ─────────────────────────────────────────────────

/// Proptest strategies for core types.
pub mod strategies {
    use crate::job::JobStatus;
    use proptest::prelude::*;

    pub fn arb_job_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![
            Just(JobStatus::Queued),
            Just(JobStatus::Running),
            Just(JobStatus::Succeeded),
            Just(JobStatus::Failed),
        ]
    }

    pub fn arb_terminal_status() -> impl Strategy<Value = JobStatus> {
        prop_oneof![Just(JobStatus::Succeeded), Just(JobStatus::Failed)]
    }

    /// Relative Swift file paths such as `Views/Home.swift`.
    pub fn arb_swift_path() -> impl Strategy<Value = String> {
        ("[A-Z][a-z]{0,8}", proptest::option::of("[A-Z][a-z]{0,8}")).prop_map(|(name, dir)| {
            match dir {
                Some(dir) => format!("{dir}/{name}.swift"),
                None => format!("{name}.swift"),
            }
        })
    }
}

// ── Request factories ───────────────────────────────────────────────────

pub const APP_SWIFT: &str = "import SwiftUI\n\n@main\nstruct TodoApp: App {\n    var body: some Scene {\n        WindowGroup { Text(\"Hello\") }\n    }\n}\n";

/// A single-file request for the `Todo` project.
pub fn todo_request() -> BuildRequest {
    BuildRequest::new("proj-1", "Todo", "com.example.todo", vec![SourceFile::new("App.swift", APP_SWIFT)])
}

/// A request for `project_name` with the given `(path, content)` files.
pub fn request_with_files(project_name: &str, files: &[(&str, &str)]) -> BuildRequest {
    BuildRequest::new(
        "proj-1",
        project_name,
        "com.example.app",
        files.iter().map(|(path, content)| SourceFile::new(*path, *content)).collect(),
    )
}
