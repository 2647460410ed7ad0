// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Follow a job through its auto-fix chain to a final answer.
//!
//! The loop is driven by [`transition`], a pure function of the latest job
//! snapshot and the time spent so far. All waiting goes through a [`Clock`].

use std::time::Duration;

use nb_core::{BuildJob, Clock, JobId, JobStatus, SystemClock};
use thiserror::Error;

use crate::client::{ClientError, JobSource};

/// Wall-clock ceiling for one chain traversal when none is configured.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(20 * 60);

/// Where the poll loop goes after looking at a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    /// Queued or running: wait one interval, re-fetch the same id.
    PollingCurrent,
    /// Failed with a successor: fetch `next` immediately.
    FollowingChain { next: JobId },
    /// Failed while a fix is being prepared: wait, re-fetch the same id.
    WaitingForFix,
    Done,
    TimedOut,
}

impl std::fmt::Display for PollState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PollState::PollingCurrent => f.write_str("polling"),
            PollState::FollowingChain { next } => write!(f, "following chain to {next}"),
            PollState::WaitingForFix => f.write_str("waiting for fix"),
            PollState::Done => f.write_str("done"),
            PollState::TimedOut => f.write_str("timed out"),
        }
    }
}

/// Next state for `job`, observed `elapsed` into a traversal bounded by
/// `ceiling`.
///
/// A final answer wins over the ceiling; any state that would wait past it
/// is [`PollState::TimedOut`].
pub fn transition(job: &BuildJob, elapsed: Duration, ceiling: Duration) -> PollState {
    let next = match (job.status, &job.next_job_id) {
        (JobStatus::Succeeded, _) => return PollState::Done,
        (JobStatus::Failed, Some(next)) => PollState::FollowingChain { next: next.clone() },
        (JobStatus::Failed, None) if job.auto_fix_in_progress => PollState::WaitingForFix,
        (JobStatus::Failed, None) => return PollState::Done,
        (JobStatus::Queued | JobStatus::Running, _) => PollState::PollingCurrent,
    };
    if elapsed >= ceiling {
        PollState::TimedOut
    } else {
        next
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self { interval: crate::env::wait_poll_interval(), timeout: DEFAULT_POLL_TIMEOUT }
    }
}

/// Final job of a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub job: BuildJob,
    /// Jobs visited, counting the first
    pub attempts: u32,
    pub elapsed: Duration,
}

impl PollOutcome {
    pub fn succeeded(&self) -> bool {
        self.job.status == JobStatus::Succeeded
    }
}

#[derive(Debug, Error)]
pub enum PollError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("job {0} not found")]
    NotFound(JobId),

    /// The ceiling passed while the chain was still in progress. Not a
    /// build failure: the job may yet finish.
    #[error("timed out after {}s waiting on job {id} ({status})", elapsed.as_secs())]
    TimedOut { id: JobId, status: JobStatus, elapsed: Duration },
}

pub struct Poller<S, C: Clock = SystemClock> {
    source: S,
    clock: C,
    config: PollConfig,
}

impl<S: JobSource> Poller<S, SystemClock> {
    pub fn new(source: S, config: PollConfig) -> Self {
        Self::with_clock(source, config, SystemClock)
    }
}

impl<S: JobSource, C: Clock> Poller<S, C> {
    pub fn with_clock(source: S, config: PollConfig, clock: C) -> Self {
        Self { source, clock, config }
    }

    pub async fn poll(&self, id: &JobId) -> Result<PollOutcome, PollError> {
        self.poll_with(id, |_, _| {}).await
    }

    /// Like [`Poller::poll`], calling `observe` with every fetched snapshot
    /// and the state it led to.
    pub async fn poll_with(
        &self,
        id: &JobId,
        mut observe: impl FnMut(&BuildJob, &PollState) + Send,
    ) -> Result<PollOutcome, PollError> {
        let start = self.clock.now();
        let mut current = id.clone();
        let mut attempts = 1;
        loop {
            let job = self.source.fetch_job(&current).await?.ok_or_else(|| PollError::NotFound(current.clone()))?;
            let elapsed = self.clock.now().saturating_duration_since(start);
            let state = transition(&job, elapsed, self.config.timeout);
            observe(&job, &state);
            match state {
                PollState::Done => return Ok(PollOutcome { job, attempts, elapsed }),
                PollState::TimedOut => {
                    return Err(PollError::TimedOut { id: job.id, status: job.status, elapsed });
                }
                PollState::FollowingChain { next } => {
                    tracing::debug!(from = %job.id, to = %next, "following auto-fix chain");
                    current = next;
                    attempts += 1;
                }
                PollState::PollingCurrent | PollState::WaitingForFix => {
                    self.clock.sleep(self.config.interval).await;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
