// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Archive download: package a stored job's sources or an inline file set.
//!
//! Packages are rebuilt on every request from the job's own files, so there
//! is no cache to lose between submission and execution.

use nb_synth::{export, ProjectSpec};
use nb_wire::{ArchiveSource, Response};

use super::ListenCtx;

pub(super) async fn handle_archive(ctx: &ListenCtx, source: ArchiveSource) -> Response {
    let request = match source {
        ArchiveSource::Files { request } => request,
        ArchiveSource::Job { id } => match ctx.store.get(&id).await {
            Ok(Some(job)) => job.request,
            Ok(None) => return Response::Error { message: format!("job {id} not found") },
            Err(e) => return Response::Error { message: e.to_string() },
        },
    };

    let spec = ProjectSpec::from_request(&request);
    match export(&request.files, &spec) {
        Ok((synthesis, package)) => {
            tracing::debug!(
                project = %synthesis.project_name,
                bytes = package.bytes.len(),
                "served archive"
            );
            Response::Archive {
                content_disposition: package.content_disposition(),
                filename: package.filename,
                bytes: package.bytes,
            }
        }
        Err(e) => Response::Error { message: format!("packaging failed: {e}") },
    }
}
