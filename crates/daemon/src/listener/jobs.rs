// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job store requests.

use nb_core::{BuildRequest, JobId, JobPatch};
use nb_storage::StoreError;
use nb_wire::{DaemonStatus, JobSummary, Response};

use super::ListenCtx;
use crate::env::DAEMON_VERSION;

fn store_error(e: StoreError) -> Response {
    Response::Error { message: e.to_string() }
}

pub(super) async fn submit(ctx: &ListenCtx, request: BuildRequest) -> Response {
    match ctx.store.submit(request).await {
        Ok(job) => Response::Submitted { job: Box::new(job) },
        Err(e) => store_error(e),
    }
}

pub(super) async fn get(ctx: &ListenCtx, id: &JobId) -> Response {
    match ctx.store.get(id).await {
        Ok(job) => Response::Job { job: job.map(Box::new) },
        Err(e) => store_error(e),
    }
}

pub(super) async fn list(ctx: &ListenCtx) -> Response {
    match ctx.store.list().await {
        Ok(jobs) => Response::Jobs { jobs: jobs.iter().map(JobSummary::from).collect() },
        Err(e) => store_error(e),
    }
}

pub(super) async fn claim(ctx: &ListenCtx, runner: &str) -> Response {
    match ctx.store.claim(runner).await {
        Ok(job) => Response::Claimed { job: job.map(Box::new) },
        Err(e) => store_error(e),
    }
}

pub(super) async fn update(ctx: &ListenCtx, id: &JobId, patch: JobPatch) -> Response {
    let finishing = patch.status;
    match ctx.store.update(id, patch).await {
        Ok(job) => {
            if let Some(status) = finishing.filter(|s| s.is_terminal()) {
                tracing::info!(job_id = %id, %status, errors = job.compiler_errors.len(), "job finished");
            }
            Response::Updated { job: Box::new(job) }
        }
        Err(e) => {
            tracing::warn!(job_id = %id, error = %e, "update rejected");
            store_error(e)
        }
    }
}

pub(super) async fn status(ctx: &ListenCtx) -> Response {
    match ctx.store.list().await {
        Ok(jobs) => {
            let mut status = DaemonStatus {
                version: DAEMON_VERSION.to_string(),
                uptime_secs: ctx.start_time.elapsed().as_secs(),
                ..DaemonStatus::default()
            };
            status.count(&jobs);
            Response::Status(status)
        }
        Err(e) => store_error(e),
    }
}
