// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Auto-fix chaining: a failed job with parsed diagnostics may be followed by
//! a successor carrying corrected sources, up to a policy's attempt limit.
//!
//! The fix itself comes from outside this crate. The driver marks the prior
//! job with [`begin`] while it works so pollers keep waiting, then either
//! [`submit_fix`] or [`abandon`].

use crate::store::{JobStore, StoreError};
use nb_core::{BuildJob, JobId, JobPatch, JobStatus, SourceFile};
use std::collections::HashSet;
use thiserror::Error;

/// Attempt limit used when none is configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("job {0} not found")]
    NotFound(JobId),

    #[error("job {id} is not eligible for auto-fix: {reason}")]
    NotEligible { id: JobId, reason: &'static str },

    #[error("job {id} is attempt {attempt} of {max}; no attempts left")]
    AttemptsExhausted { id: JobId, attempt: u32, max: u32 },
}

/// How many builds one chain may run in total.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoFixPolicy {
    pub max_attempts: u32,
}

impl Default for AutoFixPolicy {
    fn default() -> Self {
        Self { max_attempts: DEFAULT_MAX_ATTEMPTS }
    }
}

impl AutoFixPolicy {
    pub fn new(max_attempts: u32) -> Self {
        Self { max_attempts }
    }

    /// Whether `job` may be followed by a fix attempt.
    ///
    /// Infra failures (no diagnostics) never chain.
    pub fn check(&self, job: &BuildJob) -> Result<(), ChainError> {
        let not_eligible = |reason| Err(ChainError::NotEligible { id: job.id.clone(), reason });
        if job.status != JobStatus::Failed {
            return not_eligible("only failed jobs can be fixed");
        }
        if job.is_infra_failure() {
            return not_eligible("failure has no compiler diagnostics");
        }
        if job.next_job_id.is_some() {
            return not_eligible("a successor already exists");
        }
        if job.attempt >= self.max_attempts {
            return Err(ChainError::AttemptsExhausted {
                id: job.id.clone(),
                attempt: job.attempt,
                max: self.max_attempts,
            });
        }
        Ok(())
    }
}

async fn fetch<S: JobStore + ?Sized>(store: &S, id: &JobId) -> Result<BuildJob, ChainError> {
    store.get(id).await?.ok_or_else(|| ChainError::NotFound(id.clone()))
}

/// Mark `id` as having a fix in progress.
pub async fn begin<S: JobStore + ?Sized>(
    store: &S,
    policy: &AutoFixPolicy,
    id: &JobId,
) -> Result<BuildJob, ChainError> {
    let job = fetch(store, id).await?;
    policy.check(&job)?;
    let job = store.update(id, JobPatch::new().auto_fix_in_progress(true)).await?;
    tracing::info!(job_id = %id, attempt = job.attempt, "auto-fix started");
    Ok(job)
}

/// Give up on fixing `id`; its chain ends as failed.
pub async fn abandon<S: JobStore + ?Sized>(store: &S, id: &JobId) -> Result<BuildJob, ChainError> {
    let job = store.update(id, JobPatch::new().auto_fix_in_progress(false)).await?;
    tracing::info!(job_id = %id, "auto-fix abandoned");
    Ok(job)
}

/// Submit corrected `files` as the successor of `prior`.
///
/// The request keeps the prior job's project, name and bundle id. The store
/// links the two jobs in the same step that creates the successor.
pub async fn submit_fix<S: JobStore + ?Sized>(
    store: &S,
    policy: &AutoFixPolicy,
    prior: &JobId,
    files: Vec<SourceFile>,
) -> Result<BuildJob, ChainError> {
    let job = fetch(store, prior).await?;
    policy.check(&job)?;
    let mut request = job.request.clone();
    request.files = files;
    request.retry_of = Some(prior.clone());
    let next = store.submit(request).await?;
    tracing::info!(job_id = %next.id, previous = %prior, attempt = next.attempt, "auto-fix attempt submitted");
    Ok(next)
}

/// Every job in the chain containing `id`, first attempt first.
pub async fn chain<S: JobStore + ?Sized>(store: &S, id: &JobId) -> Result<Vec<BuildJob>, ChainError> {
    let mut seen = HashSet::new();
    let mut root = fetch(store, id).await?;
    seen.insert(root.id.clone());
    while let Some(previous) = root.previous_job_id.clone() {
        if !seen.insert(previous.clone()) {
            break;
        }
        match store.get(&previous).await? {
            Some(job) => root = job,
            None => break,
        }
    }

    let mut seen = HashSet::from([root.id.clone()]);
    let mut jobs = vec![root];
    while let Some(next) = jobs.last().and_then(|j| j.next_job_id.clone()) {
        if !seen.insert(next.clone()) {
            break;
        }
        match store.get(&next).await? {
            Some(job) => jobs.push(job),
            None => break,
        }
    }
    Ok(jobs)
}

#[cfg(test)]
#[path = "chain_tests.rs"]
mod tests;
