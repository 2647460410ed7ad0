// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC protocol between the daemon, runners and CLI clients.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod request;
mod response;
mod types;
mod wire;

pub use request::{ArchiveSource, Request};
pub use response::Response;
pub use types::{DaemonStatus, JobSummary};
pub use wire::{decode, encode, read_message, write_message, ProtocolError, MAX_MESSAGE_BYTES};
pub use wire::{read_request, read_response, write_request, write_response};

/// Version sent in the client side of the Hello handshake
pub const PROTOCOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod property_tests;
