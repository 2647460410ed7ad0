// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod autofix;
pub mod diagnose;
pub mod job;
pub(crate) mod job_display;
pub mod local;
pub mod runner;
pub mod status;
mod wait;
