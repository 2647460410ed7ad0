// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! nb-client: daemon client and the chain-following poll loop

mod client;
pub mod env;
pub mod poll;

pub use client::{Archive, ClientError, DaemonClient, JobSource};
pub use poll::{transition, PollConfig, PollError, PollOutcome, PollState, Poller};
