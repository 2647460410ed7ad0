// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::MemoryJobStore;
use nb_core::test_support::{todo_request, APP_SWIFT};
use nb_core::FakeClock;

const ERROR_LINE: &str = "/tmp/nb/Todo/App.swift:3:5: error: cannot find 'Foo' in scope";

fn store() -> MemoryJobStore<FakeClock> {
    MemoryJobStore::with_clock(FakeClock::new())
}

async fn failed_job(store: &MemoryJobStore<FakeClock>, errors: &[&str]) -> BuildJob {
    let job = store.submit(todo_request()).await.unwrap();
    store.claim("r").await.unwrap().unwrap();
    let errors: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
    store
        .update(&job.id, JobPatch::new().status(JobStatus::Failed).compiler_errors(errors))
        .await
        .unwrap()
}

async fn fail(store: &MemoryJobStore<FakeClock>, id: &JobId) -> BuildJob {
    store.claim("r").await.unwrap().unwrap();
    store
        .update(id, JobPatch::new().status(JobStatus::Failed).compiler_errors(vec![ERROR_LINE.to_string()]))
        .await
        .unwrap()
}

fn fixed_files() -> Vec<SourceFile> {
    vec![SourceFile::new("App.swift", APP_SWIFT)]
}

#[tokio::test]
async fn begin_then_abandon() {
    let store = store();
    let policy = AutoFixPolicy::default();
    let job = failed_job(&store, &[ERROR_LINE]).await;

    let marked = begin(&store, &policy, &job.id).await.unwrap();
    assert!(marked.auto_fix_in_progress);
    assert!(!marked.is_chain_terminal());

    let dropped = abandon(&store, &job.id).await.unwrap();
    assert!(!dropped.auto_fix_in_progress);
    assert!(dropped.is_chain_terminal());
}

#[tokio::test]
async fn submit_fix_links_the_successor() {
    let store = store();
    let policy = AutoFixPolicy::default();
    let job = failed_job(&store, &[ERROR_LINE]).await;
    begin(&store, &policy, &job.id).await.unwrap();

    let next = submit_fix(&store, &policy, &job.id, fixed_files()).await.unwrap();
    assert_eq!(next.attempt, 2);
    assert_eq!(next.status, JobStatus::Queued);
    assert_eq!(next.request.project_name, job.request.project_name);
    assert_eq!(next.request.files, fixed_files());

    let prior = store.get(&job.id).await.unwrap().unwrap();
    assert_eq!(prior.next_job_id, Some(next.id.clone()));
    assert!(!prior.auto_fix_in_progress);

    let err = submit_fix(&store, &policy, &job.id, fixed_files()).await.unwrap_err();
    assert!(matches!(err, ChainError::NotEligible { .. }), "{err:?}");
}

#[tokio::test]
async fn infra_failures_do_not_chain() {
    let store = store();
    let job = failed_job(&store, &[]).await;
    let err = begin(&store, &AutoFixPolicy::default(), &job.id).await.unwrap_err();
    assert!(matches!(err, ChainError::NotEligible { .. }), "{err:?}");
}

#[tokio::test]
async fn running_jobs_are_not_eligible() {
    let store = store();
    let job = store.submit(todo_request()).await.unwrap();
    let err = submit_fix(&store, &AutoFixPolicy::default(), &job.id, fixed_files()).await.unwrap_err();
    assert!(matches!(err, ChainError::NotEligible { .. }), "{err:?}");

    let missing = JobId::from("job-missing");
    let err = begin(&store, &AutoFixPolicy::default(), &missing).await.unwrap_err();
    assert_eq!(err, ChainError::NotFound(missing));
}

#[tokio::test]
async fn attempts_run_out() {
    let store = store();
    let policy = AutoFixPolicy::new(2);
    let first = failed_job(&store, &[ERROR_LINE]).await;
    let second = submit_fix(&store, &policy, &first.id, fixed_files()).await.unwrap();
    let second = fail(&store, &second.id).await;

    let err = submit_fix(&store, &policy, &second.id, fixed_files()).await.unwrap_err();
    assert_eq!(err, ChainError::AttemptsExhausted { id: second.id, attempt: 2, max: 2 });
}

#[tokio::test]
async fn chain_walks_from_any_member() {
    let store = store();
    let policy = AutoFixPolicy::default();
    let first = failed_job(&store, &[ERROR_LINE]).await;
    let second = submit_fix(&store, &policy, &first.id, fixed_files()).await.unwrap();
    fail(&store, &second.id).await;
    let third = submit_fix(&store, &policy, &second.id, fixed_files()).await.unwrap();

    let expected = vec![first.id.clone(), second.id.clone(), third.id.clone()];
    for start in &expected {
        let ids: Vec<JobId> = chain(&store, start).await.unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(ids, expected);
    }
    let last = chain(&store, &third.id).await.unwrap().pop().unwrap();
    assert_eq!(last.attempt, 3);
}
