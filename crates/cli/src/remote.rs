// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon seen as a [`JobStore`], so chain helpers run unchanged on the
//! client side.

use async_trait::async_trait;
use nb_client::{ClientError, DaemonClient};
use nb_core::{BuildJob, BuildRequest, JobId, JobPatch};
use nb_storage::{JobStore, StoreError};

pub struct RemoteStore<'a> {
    client: &'a DaemonClient,
}

impl<'a> RemoteStore<'a> {
    pub fn new(client: &'a DaemonClient) -> Self {
        Self { client }
    }
}

fn unavailable(err: ClientError) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

#[async_trait]
impl JobStore for RemoteStore<'_> {
    async fn submit(&self, request: BuildRequest) -> Result<BuildJob, StoreError> {
        self.client.submit(request).await.map_err(unavailable)
    }

    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, StoreError> {
        self.client.claim(runner).await.map_err(unavailable)
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, StoreError> {
        self.client.update(id, patch).await.map_err(unavailable)
    }

    async fn get(&self, id: &JobId) -> Result<Option<BuildJob>, StoreError> {
        self.client.get_job(id).await.map_err(unavailable)
    }

    /// Summaries are resolved to full jobs one by one.
    async fn list(&self) -> Result<Vec<BuildJob>, StoreError> {
        let summaries = self.client.list_jobs().await.map_err(unavailable)?;
        let mut jobs = Vec::with_capacity(summaries.len());
        for summary in summaries {
            if let Some(job) = self.get(&summary.id).await? {
                jobs.push(job);
            }
        }
        Ok(jobs)
    }
}
