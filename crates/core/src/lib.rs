// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-core: shared data model for the native build pipeline

pub mod macros;

pub mod category;
pub mod clock;
pub mod id;
pub mod job;
pub mod rules;
pub mod source;
pub mod time_fmt;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use category::ErrorCategory;
pub use clock::{Clock, FakeClock, SystemClock};
pub use id::short;
#[cfg(any(test, feature = "test-support"))]
pub use job::BuildJobBuilder;
pub use job::{BuildJob, BuildRequest, JobId, JobPatch, JobStatus, TransitionError};
pub use rules::{Hit, RuleTable};
pub use source::{normalize_path, validate_file_set, FileSetError, SourceFile};
pub use time_fmt::{format_elapsed, format_elapsed_ms};
