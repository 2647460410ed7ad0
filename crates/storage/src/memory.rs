// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory job store.

use crate::store::{JobStore, StoreError};
use crate::table::JobTable;
use async_trait::async_trait;
use nb_core::{BuildJob, BuildRequest, Clock, JobId, JobPatch, SystemClock};
use parking_lot::Mutex;
use std::sync::Arc;

/// Job store held entirely in memory behind one mutex.
///
/// Every operation runs to completion under the lock, which is what makes
/// `claim` atomic.
#[derive(Clone)]
pub struct MemoryJobStore<C: Clock = SystemClock> {
    table: Arc<Mutex<JobTable>>,
    clock: C,
}

impl MemoryJobStore<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for MemoryJobStore<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> MemoryJobStore<C> {
    pub fn with_clock(clock: C) -> Self {
        Self::from_table(JobTable::default(), clock)
    }

    pub(crate) fn from_table(table: JobTable, clock: C) -> Self {
        Self { table: Arc::new(Mutex::new(table)), clock }
    }

    /// A copy of the current table.
    pub fn table(&self) -> JobTable {
        self.table.lock().clone()
    }

    pub(crate) fn submit_now(&self, request: BuildRequest) -> Result<BuildJob, StoreError> {
        self.table.lock().submit(request, self.clock.epoch_ms())
    }

    pub(crate) fn claim_now(&self, runner: &str) -> Option<BuildJob> {
        let job = self.table.lock().claim(runner, self.clock.epoch_ms());
        if let Some(job) = &job {
            tracing::info!(job_id = %job.id, runner, attempt = job.attempt, "job claimed");
        }
        job
    }

    pub(crate) fn update_now(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, StoreError> {
        self.table.lock().update(id, patch, self.clock.epoch_ms())
    }
}

#[async_trait]
impl<C: Clock> JobStore for MemoryJobStore<C> {
    async fn submit(&self, request: BuildRequest) -> Result<BuildJob, StoreError> {
        let job = self.submit_now(request)?;
        tracing::info!(job_id = %job.id, project = %job.request.project_name, attempt = job.attempt, "job submitted");
        Ok(job)
    }

    async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, StoreError> {
        Ok(self.claim_now(runner))
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, StoreError> {
        self.update_now(id, patch)
    }

    async fn get(&self, id: &JobId) -> Result<Option<BuildJob>, StoreError> {
        Ok(self.table.lock().get(id))
    }

    async fn list(&self) -> Result<Vec<BuildJob>, StoreError> {
        Ok(self.table.lock().list())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
