// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use nb_core::{BuildRequest, JobId, JobPatch};
use serde::{Deserialize, Serialize};

/// Request from a client or runner to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Version handshake
    Hello {
        version: String,
        /// Auth token; required when the daemon has one configured
        #[serde(default, skip_serializing_if = "Option::is_none")]
        token: Option<String>,
    },

    /// Health check ping
    Ping,

    /// Queue a new build
    Submit { request: BuildRequest },

    GetJob { id: JobId },

    ListJobs,

    /// Take the oldest queued job, if any
    Claim { runner: String },

    /// Report progress or the result of a claimed job
    Update { id: JobId, patch: JobPatch },

    /// Fetch the packaged project for a stored job or an inline file set
    Archive { source: ArchiveSource },

    /// Get daemon status
    Status,
}

/// Where an archive request takes its sources from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArchiveSource {
    Job { id: JobId },
    Files { request: BuildRequest },
}
