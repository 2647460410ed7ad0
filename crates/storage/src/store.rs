// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store interface shared by the daemon, runners and poll clients.

use async_trait::async_trait;
use nb_core::{BuildJob, BuildRequest, FileSetError, JobId, JobPatch, JobStatus, TransitionError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),

    #[error("build request has no files")]
    EmptyFileSet,

    #[error("invalid file set: {0}")]
    InvalidFileSet(#[from] FileSetError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("job {id} is {status}; only failed jobs can be retried")]
    NotRetryable { id: JobId, status: JobStatus },

    #[error("job {id} already continues as {next}")]
    AlreadyChained { id: JobId, next: JobId },

    #[error("job {0} failed without compiler diagnostics; infra failures are not retried")]
    InfraFailure(JobId),

    #[error("job {next} was not submitted as the successor of {id}")]
    NotSuccessor { id: JobId, next: JobId },

    /// A remote backend could not be reached or refused the request.
    #[error("job store unavailable: {0}")]
    Unavailable(String),
}

/// Repository of build jobs.
///
/// `claim` is the one operation every implementation must make atomic: two
/// concurrent callers never receive the same job.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Record a new queued job. A request with `retry_of` set is linked as
    /// that job's successor in the same step.
    async fn submit(&self, request: BuildRequest) -> Result<BuildJob, StoreError>;

    /// Take the oldest queued job, transitioned to running, or `None` when
    /// nothing is waiting.
    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, StoreError>;

    /// Apply a partial update and return the updated job.
    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, StoreError>;

    async fn get(&self, id: &JobId) -> Result<Option<BuildJob>, StoreError>;

    /// Every job in submission order.
    async fn list(&self) -> Result<Vec<BuildJob>, StoreError>;
}
