// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use nb_core::test_support::todo_request;
use nb_core::{FileSetError, SourceFile, TransitionError};

const NOW: u64 = 5_000;

fn failed_with_errors(table: &mut JobTable) -> BuildJob {
    let job = table.submit(todo_request(), NOW).unwrap();
    table.claim("runner-a", NOW).unwrap();
    table
        .update(
            &job.id,
            JobPatch::new()
                .status(JobStatus::Failed)
                .compiler_errors(vec!["App.swift:1:1: error: cannot find 'x' in scope".to_string()]),
            NOW,
        )
        .unwrap()
}

#[test]
fn submit_queues_in_order() {
    let mut table = JobTable::default();
    let a = table.submit(todo_request(), NOW).unwrap();
    let b = table.submit(todo_request(), NOW).unwrap();
    assert_eq!(a.status, JobStatus::Queued);
    assert_eq!(a.attempt, 1);
    assert_eq!(table.queued(), vec![a.id.clone(), b.id.clone()]);
    assert_eq!(table.list().iter().map(|j| j.id.clone()).collect::<Vec<_>>(), vec![a.id, b.id]);
}

#[test]
fn submit_normalizes_and_validates_paths() {
    let mut table = JobTable::default();
    let mut request = todo_request();
    request.files = vec![SourceFile::new("./Views\\Home.swift", "")];
    let job = table.submit(request, NOW).unwrap();
    assert_eq!(job.request.files[0].path, "Views/Home.swift");

    let mut request = todo_request();
    request.files = vec![SourceFile::new("/etc/passwd", "")];
    assert!(matches!(table.submit(request, NOW), Err(StoreError::InvalidFileSet(FileSetError::Absolute(_)))));

    let mut request = todo_request();
    request.files.clear();
    assert_eq!(table.submit(request, NOW), Err(StoreError::EmptyFileSet));
}

#[test]
fn claim_is_fifo_and_runs_dry() {
    let mut table = JobTable::default();
    let a = table.submit(todo_request(), NOW).unwrap();
    let b = table.submit(todo_request(), NOW).unwrap();

    let first = table.claim("runner-a", NOW + 1).unwrap();
    assert_eq!(first.id, a.id);
    assert_eq!(first.status, JobStatus::Running);
    assert_eq!(first.runner.as_deref(), Some("runner-a"));
    assert_eq!(first.updated_at_ms, NOW + 1);
    assert_eq!(table.claim("runner-b", NOW).unwrap().id, b.id);
    assert!(table.claim("runner-a", NOW).is_none());
}

#[test]
fn update_appends_logs_and_replaces_fields() {
    let mut table = JobTable::default();
    let job = table.submit(todo_request(), NOW).unwrap();
    table.claim("runner-a", NOW).unwrap();
    table.update(&job.id, JobPatch::new().log("one"), NOW).unwrap();
    let job = table
        .update(&job.id, JobPatch::new().log("two").status(JobStatus::Succeeded), NOW)
        .unwrap();
    assert_eq!(job.logs, vec!["one", "two"]);
    assert_eq!(job.status, JobStatus::Succeeded);
}

#[test]
fn update_rejects_bad_transitions() {
    let mut table = JobTable::default();
    let job = table.submit(todo_request(), NOW).unwrap();
    let err = table.update(&job.id, JobPatch::new().status(JobStatus::Running), NOW).unwrap_err();
    assert_eq!(err, StoreError::Transition(TransitionError::ClaimRequired(job.id.clone())));

    let missing = JobId::from("job-missing");
    assert_eq!(table.update(&missing, JobPatch::new(), NOW), Err(StoreError::NotFound(missing.clone())));
    let err = table.update(&job.id, JobPatch::new().next_job_id(missing.clone()), NOW).unwrap_err();
    assert_eq!(err, StoreError::NotFound(missing));
}

#[test]
fn retry_links_both_jobs() {
    let mut table = JobTable::default();
    let prior = failed_with_errors(&mut table);
    table.update(&prior.id, JobPatch::new().auto_fix_in_progress(true), NOW).unwrap();

    let next = table.submit(todo_request().retry_of(prior.id.clone()), NOW + 10).unwrap();
    assert_eq!(next.attempt, 2);
    assert_eq!(next.previous_job_id.as_ref(), Some(&prior.id));

    let prior = table.get(&prior.id).unwrap();
    assert_eq!(prior.next_job_id.as_ref(), Some(&next.id));
    assert!(!prior.auto_fix_in_progress);
    assert_eq!(prior.updated_at_ms, NOW + 10);
}

#[test]
fn retry_requires_an_unchained_failure() {
    let mut table = JobTable::default();
    let queued = table.submit(todo_request(), NOW).unwrap();
    let err = table.submit(todo_request().retry_of(queued.id.clone()), NOW).unwrap_err();
    assert_eq!(err, StoreError::NotRetryable { id: queued.id.clone(), status: JobStatus::Queued });

    let prior = failed_with_errors(&mut table);
    let next = table.submit(todo_request().retry_of(prior.id.clone()), NOW).unwrap();
    let err = table.submit(todo_request().retry_of(prior.id.clone()), NOW).unwrap_err();
    assert_eq!(err, StoreError::AlreadyChained { id: prior.id, next: next.id });

    let before = table.len();
    let missing = JobId::from("job-missing");
    assert_eq!(table.submit(todo_request().retry_of(missing.clone()), NOW), Err(StoreError::NotFound(missing)));
    assert_eq!(table.len(), before, "rejected submissions create nothing");
}

#[test]
fn infra_failures_are_not_retried() {
    let mut table = JobTable::default();
    let job = table.submit(todo_request(), NOW).unwrap();
    table.claim("runner-a", NOW).unwrap();
    table
        .update(&job.id, JobPatch::new().status(JobStatus::Failed).error("xcodebuild not found"), NOW)
        .unwrap();

    let before = table.len();
    let err = table.submit(todo_request().retry_of(job.id.clone()), NOW).unwrap_err();
    assert_eq!(err, StoreError::InfraFailure(job.id.clone()));
    assert_eq!(table.len(), before);
    assert_eq!(table.get(&job.id).unwrap().next_job_id, None);
}

#[yare::parameterized(
    itself = { true },
    unrelated = { false },
)]
fn next_link_must_name_a_successor(to_self: bool) {
    let mut table = JobTable::default();
    let older = table.submit(todo_request(), NOW).unwrap();
    let job = failed_with_errors(&mut table);
    let target = if to_self { job.id.clone() } else { older.id.clone() };

    let err = table.update(&job.id, JobPatch::new().next_job_id(target.clone()), NOW).unwrap_err();
    assert_eq!(err, StoreError::NotSuccessor { id: job.id.clone(), next: target });
    assert_eq!(table.get(&job.id).unwrap().next_job_id, None);
}

#[test]
fn next_link_may_restate_the_real_successor() {
    let mut table = JobTable::default();
    let prior = failed_with_errors(&mut table);
    let next = table.submit(todo_request().retry_of(prior.id.clone()), NOW).unwrap();
    let job = table.update(&prior.id, JobPatch::new().next_job_id(next.id.clone()), NOW).unwrap();
    assert_eq!(job.next_job_id, Some(next.id));
}

#[test]
fn table_round_trips_through_json() {
    let mut table = JobTable::default();
    table.submit(todo_request(), NOW).unwrap();
    failed_with_errors(&mut table);
    let json = serde_json::to_string(&table).unwrap();
    let back: JobTable = serde_json::from_str(&json).unwrap();
    assert_eq!(back, table);
}
