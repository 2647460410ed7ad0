// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-runner: claims queued builds, compiles them and reports the result

pub mod backend;
pub mod config;
pub mod env;
pub mod executor;
mod runner;
pub mod scratch;
pub mod streamer;
pub mod toolchain;

pub use backend::JobBackend;
pub use config::{ConfigError, RunnerConfig};
pub use executor::{BuildExecutor, ExecError, Invocation, XcodebuildExecutor};
pub use runner::{Runner, RunnerError};
pub use scratch::{locate_project, strip_scratch_prefix, Scratch};
pub use streamer::LogStreamer;
pub use toolchain::{locate_xcodebuild, ToolchainNotFound};
