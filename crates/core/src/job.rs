// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Build job record and its status state machine.

use crate::source::SourceFile;
use serde::{Deserialize, Serialize};
use thiserror::Error;

crate::define_id! {
    /// Unique identifier of one build attempt.
    ///
    /// Successive auto-fix attempts get fresh ids and are linked through
    /// `next_job_id` / `previous_job_id`.
    pub struct JobId("job-");
}

/// Lifecycle status of a build job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Succeeded | JobStatus::Failed)
    }
}

crate::simple_display! {
    JobStatus {
        Queued => "queued",
        Running => "running",
        Succeeded => "succeeded",
        Failed => "failed",
    }
}

/// What the generation layer submits: a project name, a bundle id and the
/// files to compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRequest {
    pub project_id: String,
    pub files: Vec<SourceFile>,
    pub project_name: String,
    pub bundle_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub development_team: Option<String>,
    /// Prior job this request is a fix for; the store links both atomically.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_of: Option<JobId>,
}

impl BuildRequest {
    pub fn new(
        project_id: impl Into<String>,
        project_name: impl Into<String>,
        bundle_id: impl Into<String>,
        files: Vec<SourceFile>,
    ) -> Self {
        Self {
            project_id: project_id.into(),
            files,
            project_name: project_name.into(),
            bundle_id: bundle_id.into(),
            development_team: None,
            retry_of: None,
        }
    }

    crate::setters! {
        option {
            development_team: String,
            retry_of: JobId,
        }
    }
}

/// One request to compile a packaged source tree, plus everything the runner
/// reported about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildJob {
    pub id: JobId,
    pub status: JobStatus,
    pub request: BuildRequest,
    /// Append-only
    #[serde(default)]
    pub logs: Vec<String>,
    #[serde(default)]
    pub compiler_errors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_job_id: Option<JobId>,
    #[serde(default)]
    pub auto_fix_in_progress: bool,
    /// 1-based position in the auto-fix chain
    #[serde(default = "first_attempt")]
    pub attempt: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_job_id: Option<JobId>,
    /// Identity of the runner that claimed the job
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runner: Option<String>,
    #[serde(default)]
    pub created_at_ms: u64,
    #[serde(default)]
    pub updated_at_ms: u64,
}

fn first_attempt() -> u32 {
    1
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("job {0} can only start running through claim")]
    ClaimRequired(JobId),

    #[error("job {id} already finished as {status}")]
    AlreadyFinished { id: JobId, status: JobStatus },

    #[error("job {id} cannot move from {from} to {to}")]
    Invalid { id: JobId, from: JobStatus, to: JobStatus },
}

impl BuildJob {
    /// A freshly submitted job.
    pub fn new(id: JobId, request: BuildRequest, attempt: u32, epoch_ms: u64) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            request,
            logs: Vec::new(),
            compiler_errors: Vec::new(),
            error: None,
            next_job_id: None,
            auto_fix_in_progress: false,
            attempt,
            previous_job_id: None,
            runner: None,
            created_at_ms: epoch_ms,
            updated_at_ms: epoch_ms,
        }
    }

    /// Whether following this job's chain has reached its final answer.
    ///
    /// True for `succeeded`, or `failed` with no successor and no fix pending.
    pub fn is_chain_terminal(&self) -> bool {
        match self.status {
            JobStatus::Succeeded => true,
            JobStatus::Failed => self.next_job_id.is_none() && !self.auto_fix_in_progress,
            JobStatus::Queued | JobStatus::Running => false,
        }
    }

    /// A failure with parsed diagnostics, eligible for auto-fix.
    pub fn is_actionable_failure(&self) -> bool {
        self.status == JobStatus::Failed && !self.compiler_errors.is_empty()
    }

    /// A failure with no diagnostics: packaging, toolchain or timeout.
    pub fn is_infra_failure(&self) -> bool {
        self.status == JobStatus::Failed && self.compiler_errors.is_empty()
    }

    /// Transition `queued` to `running` on behalf of `runner`.
    pub fn claim(&mut self, runner: &str, epoch_ms: u64) -> Result<(), TransitionError> {
        if self.status != JobStatus::Queued {
            return Err(self.rejected(JobStatus::Running));
        }
        self.status = JobStatus::Running;
        self.runner = Some(runner.to_string());
        self.updated_at_ms = epoch_ms;
        Ok(())
    }

    /// Apply a partial update: logs are appended, every other present field
    /// replaces the current value.
    ///
    /// The status change is validated before anything is written, so a
    /// rejected patch leaves the job untouched.
    pub fn apply(&mut self, patch: JobPatch, epoch_ms: u64) -> Result<(), TransitionError> {
        if let Some(to) = patch.status {
            self.check_transition(to)?;
        }

        self.logs.extend(patch.logs);
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(errors) = patch.compiler_errors {
            self.compiler_errors = errors;
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
        if let Some(next) = patch.next_job_id {
            self.next_job_id = Some(next);
        }
        if let Some(flag) = patch.auto_fix_in_progress {
            self.auto_fix_in_progress = flag;
        }
        self.updated_at_ms = epoch_ms;
        Ok(())
    }

    fn check_transition(&self, to: JobStatus) -> Result<(), TransitionError> {
        match (self.status, to) {
            (from, to) if from == to => Ok(()),
            (JobStatus::Queued, JobStatus::Running) => Err(TransitionError::ClaimRequired(self.id.clone())),
            (JobStatus::Running, JobStatus::Succeeded | JobStatus::Failed) => Ok(()),
            (_, to) => Err(self.rejected(to)),
        }
    }

    fn rejected(&self, to: JobStatus) -> TransitionError {
        if self.status.is_terminal() {
            TransitionError::AlreadyFinished { id: self.id.clone(), status: self.status }
        } else {
            TransitionError::Invalid { id: self.id.clone(), from: self.status, to }
        }
    }
}

/// Partial update sent by the claiming runner or the auto-fix driver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compiler_errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_job_id: Option<JobId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_fix_in_progress: Option<bool>,
}

impl JobPatch {
    pub fn new() -> Self {
        Self::default()
    }

    crate::setters! {
        set {
            logs: Vec<String>,
        }
        option {
            status: JobStatus,
            compiler_errors: Vec<String>,
            error: String,
            next_job_id: JobId,
            auto_fix_in_progress: bool,
        }
    }

    /// Append a single log line.
    pub fn log(mut self, line: impl Into<String>) -> Self {
        self.logs.push(line.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

crate::builder! {
    pub struct BuildJobBuilder => BuildJob {
        into {
            id: JobId = "job-test",
        }
        set {
            status: JobStatus = JobStatus::Queued,
            request: BuildRequest = BuildRequest::new(
                "proj-1",
                "Todo",
                "com.example.todo",
                vec![SourceFile::new("App.swift", "import SwiftUI")],
            ),
            logs: Vec<String> = Vec::new(),
            compiler_errors: Vec<String> = Vec::new(),
            auto_fix_in_progress: bool = false,
            attempt: u32 = 1,
            created_at_ms: u64 = 1_000_000,
            updated_at_ms: u64 = 1_000_000,
        }
        option {
            error: String = None,
            next_job_id: JobId = None,
            previous_job_id: JobId = None,
            runner: String = None,
        }
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
