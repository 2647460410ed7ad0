// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-storage: build job persistence with atomic claim and auto-fix chaining

pub mod chain;
mod memory;
mod snapshot;
mod store;
mod table;

pub use chain::{AutoFixPolicy, ChainError, DEFAULT_MAX_ATTEMPTS};
pub use memory::MemoryJobStore;
pub use snapshot::{load_snapshot, Snapshot, SnapshotError, SnapshotJobStore, CURRENT_SNAPSHOT_VERSION};
pub use store::{JobStore, StoreError};
pub use table::JobTable;
