// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nb_core::BuildJob;
use serde::{Deserialize, Serialize};

use super::{DaemonStatus, JobSummary};

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    /// Version handshake response
    Hello { version: String },

    /// Health check response
    Pong,

    /// Job was queued
    Submitted { job: Box<BuildJob> },

    /// Single job details
    Job { job: Option<Box<BuildJob>> },

    /// Every job, in submission order
    Jobs { jobs: Vec<JobSummary> },

    /// Result of a claim; `None` when nothing is queued
    Claimed { job: Option<Box<BuildJob>> },

    /// Job after an accepted update
    Updated { job: Box<BuildJob> },

    /// Packaged project
    Archive {
        filename: String,
        content_disposition: String,
        bytes: Vec<u8>,
    },

    Status(DaemonStatus),

    /// Error response
    Error { message: String },
}
