// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `nb wait`: follow a job's chain to its final answer.

use anyhow::Result;

use nb_client::{DaemonClient, PollConfig, PollError, PollOutcome, PollState, Poller};
use nb_core::{format_elapsed, BuildJob, JobId};

use crate::color;
use crate::exit_error::{ExitError, EXIT_FAILED, EXIT_TIMED_OUT};
use crate::output::OutputFormat;

use super::job::parse_duration;

pub(crate) async fn handle(
    client: &DaemonClient,
    id: &str,
    timeout: Option<String>,
    format: OutputFormat,
) -> Result<()> {
    let mut config = PollConfig::default();
    if let Some(t) = timeout {
        config.timeout = parse_duration(&t)?;
    }
    let poller = Poller::new(client.clone(), config);

    let mut last: Option<(JobId, String)> = None;
    let result = poller
        .poll_with(&JobId::from(id), |job, state| {
            if format != OutputFormat::Text {
                return;
            }
            let line = progress_line(job, state);
            let key = (job.id.clone(), line.clone());
            if last.as_ref() != Some(&key) {
                eprintln!("{line}");
                last = Some(key);
            }
        })
        .await;

    match result {
        Ok(outcome) => report(&outcome, format),
        Err(PollError::TimedOut { id, status, elapsed }) => {
            if format == OutputFormat::Json {
                let obj = serde_json::json!({
                    "id": id,
                    "status": status,
                    "timed_out": true,
                    "elapsed_ms": elapsed.as_millis() as u64,
                });
                println!("{}", serde_json::to_string_pretty(&obj)?);
            }
            Err(ExitError::new(
                EXIT_TIMED_OUT,
                format!("timed out after {} waiting on {id} (still {status})", format_elapsed(elapsed.as_secs())),
            )
            .into())
        }
        Err(e) => Err(e.into()),
    }
}

fn progress_line(job: &BuildJob, state: &PollState) -> String {
    match state {
        PollState::FollowingChain { next } => format!("{} failed, following auto-fix to {next}", job.id),
        PollState::WaitingForFix => format!("{} failed, waiting for auto-fix", job.id),
        _ => format!("{} {}", job.id, job.status),
    }
}

fn report(outcome: &PollOutcome, format: OutputFormat) -> Result<()> {
    let job = &outcome.job;
    match format {
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "job": job,
                "attempts": outcome.attempts,
                "elapsed_ms": outcome.elapsed.as_millis() as u64,
                "succeeded": outcome.succeeded(),
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
        OutputFormat::Text => {
            println!(
                "{} {} after {} attempt(s) in {}",
                job.id,
                color::status(&job.status.to_string()),
                outcome.attempts,
                format_elapsed(outcome.elapsed.as_secs())
            );
            if let Some(error) = &job.error {
                println!("  {} {}", color::context("Error:"), error);
            }
            for line in &job.compiler_errors {
                println!("  {line}");
            }
        }
    }
    if outcome.succeeded() {
        Ok(())
    } else {
        Err(ExitError::silent(EXIT_FAILED).into())
    }
}
