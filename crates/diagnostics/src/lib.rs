// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-diagnostics: compiler diagnostic extraction, classification and
//! frequency statistics

pub mod classify;
pub mod extract;
pub mod stats;
pub mod suggest;

pub use classify::{analyze, classify, extract_symbol, Diagnostic};
pub use extract::{extract_errors, normalize, DEFAULT_ERROR_CAP};
pub use stats::{CategoryCount, ChainStats, DiagnosticStats, MessageCount};
pub use suggest::suggestion;
