// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Property tests for protocol serde roundtrips and DTO conversions.

use nb_core::test_support::strategies::arb_job_status;
use nb_core::test_support::todo_request;
use nb_core::{BuildJobBuilder, JobId, JobPatch, JobStatus};
use proptest::prelude::*;

use super::wire::{decode, encode};
use super::*;

fn id() -> JobId {
    JobId::from("job-abc")
}

fn all_requests() -> Vec<Request> {
    vec![
        Request::Hello { version: String::new(), token: None },
        Request::Hello { version: "0.1.0+abc".to_string(), token: Some("secret".to_string()) },
        Request::Ping,
        Request::Submit { request: todo_request() },
        Request::GetJob { id: id() },
        Request::ListJobs,
        Request::Claim { runner: "mac-mini-1".to_string() },
        Request::Update { id: id(), patch: JobPatch::new().log("line").status(JobStatus::Failed) },
        Request::Archive { source: ArchiveSource::Job { id: id() } },
        Request::Archive { source: ArchiveSource::Files { request: todo_request() } },
        Request::Status,
    ]
}

fn all_responses() -> Vec<Response> {
    let job = Box::new(BuildJobBuilder::default().build());
    vec![
        Response::Hello { version: String::new() },
        Response::Pong,
        Response::Submitted { job: job.clone() },
        Response::Job { job: None },
        Response::Job { job: Some(job.clone()) },
        Response::Jobs { jobs: vec![JobSummary::from(job.as_ref())] },
        Response::Claimed { job: None },
        Response::Claimed { job: Some(job.clone()) },
        Response::Updated { job },
        Response::Archive {
            filename: "Todo.tar.gz".to_string(),
            content_disposition: "attachment; filename=\"Todo.tar.gz\"".to_string(),
            bytes: vec![0x1f, 0x8b, 0, 255],
        },
        Response::Status(DaemonStatus::default()),
        Response::Error { message: String::new() },
    ]
}

proptest! {
    #[test]
    fn request_serde_roundtrip(req in proptest::sample::select(all_requests())) {
        let encoded = encode(&req).expect("encode");
        let decoded: Request = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, req);
    }

    #[test]
    fn response_serde_roundtrip(resp in proptest::sample::select(all_responses())) {
        let encoded = encode(&resp).expect("encode");
        let decoded: Response = decode(&encoded).expect("decode");
        prop_assert_eq!(decoded, resp);
    }

    #[test]
    fn status_counts_every_job(statuses in proptest::collection::vec(arb_job_status(), 0..20)) {
        let jobs: Vec<_> = statuses.iter().map(|s| BuildJobBuilder::default().status(*s).build()).collect();
        let mut status = DaemonStatus::default();
        status.count(&jobs);
        prop_assert_eq!(status.jobs_total, jobs.len());
        prop_assert_eq!(status.queued + status.running + status.succeeded + status.failed, jobs.len());
    }
}
