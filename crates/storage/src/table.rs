// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The job table every store implementation mutates under its lock.

use crate::store::StoreError;
use nb_core::{validate_file_set, BuildJob, BuildRequest, JobId, JobPatch, JobStatus};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// All jobs plus the FIFO queue of ids waiting to be claimed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobTable {
    jobs: HashMap<JobId, BuildJob>,
    /// Submission order, for listing
    order: Vec<JobId>,
    queue: VecDeque<JobId>,
}

impl JobTable {
    pub fn submit(&mut self, mut request: BuildRequest, epoch_ms: u64) -> Result<BuildJob, StoreError> {
        if request.files.is_empty() {
            return Err(StoreError::EmptyFileSet);
        }
        request.files = validate_file_set(&request.files)?;

        let id = JobId::new();
        let mut attempt = 1;
        let mut previous = None;
        if let Some(prior_id) = request.retry_of.clone() {
            let prior = self.jobs.get_mut(&prior_id).ok_or_else(|| StoreError::NotFound(prior_id.clone()))?;
            if prior.status != JobStatus::Failed {
                return Err(StoreError::NotRetryable { id: prior_id, status: prior.status });
            }
            if let Some(next) = &prior.next_job_id {
                return Err(StoreError::AlreadyChained { id: prior_id, next: next.clone() });
            }
            if prior.is_infra_failure() {
                return Err(StoreError::InfraFailure(prior_id));
            }
            prior.next_job_id = Some(id.clone());
            prior.auto_fix_in_progress = false;
            prior.updated_at_ms = epoch_ms;
            attempt = prior.attempt + 1;
            previous = Some(prior_id);
        }

        let mut job = BuildJob::new(id.clone(), request, attempt, epoch_ms);
        job.previous_job_id = previous;
        self.jobs.insert(id.clone(), job.clone());
        self.order.push(id.clone());
        self.queue.push_back(id);
        Ok(job)
    }

    /// Pop the oldest queued job and mark it running for `runner`.
    pub fn claim(&mut self, runner: &str, epoch_ms: u64) -> Option<BuildJob> {
        while let Some(id) = self.queue.pop_front() {
            let Some(job) = self.jobs.get_mut(&id) else {
                continue;
            };
            if job.claim(runner, epoch_ms).is_ok() {
                return Some(job.clone());
            }
        }
        None
    }

    pub fn update(&mut self, id: &JobId, patch: JobPatch, epoch_ms: u64) -> Result<BuildJob, StoreError> {
        // Links are only ever made by `submit`; a patch may restate one
        if let Some(next) = &patch.next_job_id {
            let target = self.jobs.get(next).ok_or_else(|| StoreError::NotFound(next.clone()))?;
            if target.previous_job_id.as_ref() != Some(id) {
                return Err(StoreError::NotSuccessor { id: id.clone(), next: next.clone() });
            }
        }
        let job = self.jobs.get_mut(id).ok_or_else(|| StoreError::NotFound(id.clone()))?;
        job.apply(patch, epoch_ms)?;
        Ok(job.clone())
    }

    pub fn get(&self, id: &JobId) -> Option<BuildJob> {
        self.jobs.get(id).cloned()
    }

    /// Every job in submission order.
    pub fn list(&self) -> Vec<BuildJob> {
        self.order.iter().filter_map(|id| self.jobs.get(id).cloned()).collect()
    }

    /// Ids waiting to be claimed, oldest first.
    pub fn queued(&self) -> Vec<JobId> {
        self.queue.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod tests;
