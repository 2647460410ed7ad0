// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! DTO structs for the IPC protocol.

use nb_core::{BuildJob, JobId, JobStatus};
use serde::{Deserialize, Serialize};

/// Summary of a job for listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSummary {
    pub id: JobId,
    pub status: JobStatus,
    pub project_name: String,
    pub attempt: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_job_id: Option<JobId>,
    #[serde(default)]
    pub auto_fix_in_progress: bool,
    pub error_count: usize,
    pub created_at_ms: u64,
    pub updated_at_ms: u64,
}

impl From<&BuildJob> for JobSummary {
    fn from(job: &BuildJob) -> Self {
        JobSummary {
            id: job.id.clone(),
            status: job.status,
            project_name: job.request.project_name.clone(),
            attempt: job.attempt,
            runner: job.runner.clone(),
            next_job_id: job.next_job_id.clone(),
            auto_fix_in_progress: job.auto_fix_in_progress,
            error_count: job.compiler_errors.len(),
            created_at_ms: job.created_at_ms,
            updated_at_ms: job.updated_at_ms,
        }
    }
}

/// Daemon status overview
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DaemonStatus {
    pub version: String,
    pub uptime_secs: u64,
    pub jobs_total: usize,
    pub queued: usize,
    pub running: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DaemonStatus {
    /// Tally `jobs` by status.
    pub fn count<'a>(&mut self, jobs: impl IntoIterator<Item = &'a BuildJob>) {
        for job in jobs {
            self.jobs_total += 1;
            match job.status {
                JobStatus::Queued => self.queued += 1,
                JobStatus::Running => self.running += 1,
                JobStatus::Succeeded => self.succeeded += 1,
                JobStatus::Failed => self.failed += 1,
            }
        }
    }
}
