// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-synth: Xcode project synthesis and deterministic packaging

mod assemble;
pub mod naming;
pub mod package;
pub mod pbx;
pub mod rules;
pub mod scheme;
pub mod synthesize;
pub mod widget;

pub use package::{
    archive_filename, content_disposition, export, package, read_entries, unpack, Package, PackageError,
};
pub use rules::{Baseline, Permission};
pub use synthesize::{inspect, synthesize, Inspection, ProjectSpec, SynthError, Synthesis};
pub use widget::WidgetTargetSpec;
