// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use nb_core::FakeClock;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

const INTERVAL: Duration = Duration::from_secs(2);
const CEILING: Duration = Duration::from_secs(60);

/// Returns scripted snapshots per id; the last one repeats.
#[derive(Default)]
struct Script {
    jobs: Mutex<HashMap<JobId, VecDeque<BuildJob>>>,
    fetches: Mutex<Vec<JobId>>,
}

impl Script {
    fn then(self, job: BuildJob) -> Self {
        self.jobs.lock().entry(job.id.clone()).or_default().push_back(job);
        self
    }

    fn fetches(&self) -> Vec<JobId> {
        self.fetches.lock().clone()
    }
}

#[async_trait]
impl JobSource for Script {
    async fn fetch_job(&self, id: &JobId) -> Result<Option<BuildJob>, ClientError> {
        self.fetches.lock().push(id.clone());
        let mut jobs = self.jobs.lock();
        let Some(queue) = jobs.get_mut(id) else {
            return Ok(None);
        };
        if queue.len() > 1 {
            Ok(queue.pop_front())
        } else {
            Ok(queue.front().cloned())
        }
    }
}

fn job(id: &str, status: JobStatus) -> BuildJob {
    BuildJob::builder().id(id).status(status).build()
}

fn poller(script: Script) -> (Poller<Script, FakeClock>, FakeClock) {
    let clock = FakeClock::new();
    let config = PollConfig { interval: INTERVAL, timeout: CEILING };
    (Poller::with_clock(script, config, clock.clone()), clock)
}

#[yare::parameterized(
    queued = { JobStatus::Queued, false, false, PollState::PollingCurrent },
    running = { JobStatus::Running, false, false, PollState::PollingCurrent },
    succeeded = { JobStatus::Succeeded, false, false, PollState::Done },
    failed_final = { JobStatus::Failed, false, false, PollState::Done },
    failed_fixing = { JobStatus::Failed, false, true, PollState::WaitingForFix },
    failed_chained = { JobStatus::Failed, true, false, PollState::FollowingChain { next: JobId::from("job-next") } },
)]
fn transition_table(status: JobStatus, chained: bool, fixing: bool, expected: PollState) {
    let mut job = job("job-1", status);
    job.auto_fix_in_progress = fixing;
    if chained {
        job.next_job_id = Some(JobId::from("job-next"));
    }
    assert_eq!(transition(&job, Duration::ZERO, CEILING), expected);
}

#[yare::parameterized(
    running = { JobStatus::Running, false, PollState::TimedOut },
    fixing = { JobStatus::Failed, true, PollState::TimedOut },
    succeeded = { JobStatus::Succeeded, false, PollState::Done },
    failed = { JobStatus::Failed, false, PollState::Done },
)]
fn final_answers_win_over_the_ceiling(status: JobStatus, fixing: bool, expected: PollState) {
    let mut job = job("job-1", status);
    job.auto_fix_in_progress = fixing;
    assert_eq!(transition(&job, CEILING, CEILING), expected);
}

#[tokio::test]
async fn failed_then_fixed_chain_reports_two_attempts() {
    let mut first = job("job-1", JobStatus::Failed);
    first.next_job_id = Some(JobId::from("job-2"));
    let script = Script::default()
        .then(first)
        .then(job("job-2", JobStatus::Queued))
        .then(job("job-2", JobStatus::Running))
        .then(job("job-2", JobStatus::Succeeded));
    let (poller, clock) = poller(script);

    let outcome = poller.poll(&JobId::from("job-1")).await.unwrap();
    assert!(outcome.succeeded());
    assert_eq!(outcome.job.id, JobId::from("job-2"));
    assert_eq!(outcome.attempts, 2);
    assert_eq!(clock.sleeps(), vec![INTERVAL, INTERVAL]);
    assert_eq!(outcome.elapsed, INTERVAL * 2);
}

#[tokio::test]
async fn pending_fix_keeps_waiting_on_the_same_job() {
    let mut fixing = job("job-1", JobStatus::Failed);
    fixing.auto_fix_in_progress = true;
    let mut chained = fixing.clone();
    chained.auto_fix_in_progress = false;
    chained.next_job_id = Some(JobId::from("job-2"));
    let script = Script::default()
        .then(fixing.clone())
        .then(fixing.clone())
        .then(fixing)
        .then(chained)
        .then(job("job-2", JobStatus::Failed));
    let (poller, _) = poller(script);

    let mut states = Vec::new();
    let outcome = poller.poll_with(&JobId::from("job-1"), |_, state| states.push(state.clone())).await.unwrap();
    assert!(!outcome.succeeded());
    assert_eq!(outcome.attempts, 2);
    assert_eq!(
        states,
        vec![
            PollState::WaitingForFix,
            PollState::WaitingForFix,
            PollState::WaitingForFix,
            PollState::FollowingChain { next: JobId::from("job-2") },
            PollState::Done,
        ]
    );
    let fetched = poller.source.fetches();
    assert_eq!(fetched.iter().filter(|id| id.as_str() == "job-1").count(), 4);
}

#[tokio::test]
async fn infra_failure_returns_immediately() {
    let script = Script::default().then(job("job-1", JobStatus::Failed));
    let (poller, clock) = poller(script);
    let outcome = poller.poll(&JobId::from("job-1")).await.unwrap();
    assert_eq!(outcome.attempts, 1);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn stuck_job_times_out_distinctly() {
    let script = Script::default().then(job("job-1", JobStatus::Running));
    let (poller, clock) = poller(script);

    let err = poller.poll(&JobId::from("job-1")).await.unwrap_err();
    match err {
        PollError::TimedOut { id, status, elapsed } => {
            assert_eq!(id, JobId::from("job-1"));
            assert_eq!(status, JobStatus::Running);
            assert_eq!(elapsed, CEILING);
        }
        other => panic!("expected TimedOut, got {other:?}"),
    }
    assert_eq!(clock.sleeps().len() as u32, (CEILING.as_secs() / INTERVAL.as_secs()) as u32);
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let (poller, _) = poller(Script::default());
    let err = poller.poll(&JobId::from("job-404")).await.unwrap_err();
    assert!(matches!(err, PollError::NotFound(ref id) if id.as_str() == "job-404"), "{err:?}");
}
