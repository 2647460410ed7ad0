// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The runner's view of the job store.

use async_trait::async_trait;
use nb_client::{ClientError, DaemonClient};
use nb_core::{BuildJob, JobId, JobPatch};
use nb_wire::ArchiveSource;

#[async_trait]
pub trait JobBackend: Send + Sync {
    /// Atomically take the oldest queued job, if any.
    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, ClientError>;

    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, ClientError>;

    /// Package bytes for `job`.
    async fn archive(&self, job: &BuildJob) -> Result<Vec<u8>, ClientError>;
}

#[async_trait]
impl JobBackend for DaemonClient {
    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, ClientError> {
        DaemonClient::claim(self, runner).await
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, ClientError> {
        DaemonClient::update(self, id, patch).await
    }

    async fn archive(&self, job: &BuildJob) -> Result<Vec<u8>, ClientError> {
        let archive = DaemonClient::archive(self, ArchiveSource::Job { id: job.id.clone() }).await?;
        Ok(archive.bytes)
    }
}
