// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job commands: submit, inspect and download builds through the daemon.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;

use nb_client::DaemonClient;
use nb_core::{BuildRequest, JobId, JobStatus};
use nb_wire::ArchiveSource;

use crate::files;
use crate::output::{apply_limit, format_or_json, handle_list, OutputFormat};

use super::job_display::{format_job_list, print_job};

#[derive(Subcommand)]
pub enum JobCommand {
    /// Submit Swift sources for a build
    Submit {
        /// Source files or directories (directories contribute every .swift file)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Project name; sanitized into the target name
        #[arg(long)]
        name: String,

        /// Application bundle identifier
        #[arg(long, default_value = "com.example.app")]
        bundle_id: String,

        /// Caller-side project identifier (defaults to the name)
        #[arg(long)]
        project_id: Option<String>,

        /// Development team for signing settings
        #[arg(long)]
        team: Option<String>,

        /// Link the new job as the successor of a failed one
        #[arg(long)]
        retry_of: Option<String>,

        /// Wait for the chain to finish after submitting
        #[arg(long)]
        wait: bool,

        /// Wait timeout (e.g. "20m", "90s")
        #[arg(long, requires = "wait")]
        timeout: Option<String>,
    },
    /// Show details of a job
    Show {
        /// Job ID
        id: String,
    },
    /// Print a job's build log
    Logs {
        /// Job ID
        id: String,

        /// Number of recent lines to show (default: all)
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List jobs, newest first
    List {
        /// Filter by status (queued, running, succeeded, failed)
        #[arg(long)]
        status: Option<String>,

        /// Maximum number of jobs to show (default: 20)
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Show all jobs (no limit)
        #[arg(long, conflicts_with = "limit")]
        no_limit: bool,
    },
    /// Block until a job's auto-fix chain reaches a final answer
    ///
    /// Exits 0 when the chain succeeds, 1 when it fails and 2 on timeout.
    Wait {
        /// Job ID (any attempt in the chain)
        id: String,

        /// Timeout duration (e.g. "5m", "30s", "1h")
        #[arg(long)]
        timeout: Option<String>,
    },
    /// Download the package a job builds
    Archive {
        /// Job ID
        id: String,

        /// Output path (defaults to the archive's own file name)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Parse a human-readable duration string (e.g. "5m", "30s", "1h30m")
pub fn parse_duration(s: &str) -> Result<Duration> {
    let mut total_secs: u64 = 0;
    let mut current_num = String::new();

    for c in s.chars() {
        if c.is_ascii_digit() {
            current_num.push(c);
        } else {
            let n: u64 = current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
            current_num.clear();
            match c {
                'h' => total_secs += n * 3600,
                'm' => total_secs += n * 60,
                's' => total_secs += n,
                _ => anyhow::bail!("unknown duration unit '{}' in: {}", c, s),
            }
        }
    }
    // Bare number → seconds
    if !current_num.is_empty() {
        let n: u64 = current_num.parse().map_err(|_| anyhow::anyhow!("invalid duration: {}", s))?;
        total_secs += n;
    }
    if total_secs == 0 {
        anyhow::bail!("duration must be > 0: {}", s);
    }
    Ok(Duration::from_secs(total_secs))
}

fn parse_status(s: &str) -> Result<JobStatus> {
    match s.to_lowercase().as_str() {
        "queued" => Ok(JobStatus::Queued),
        "running" => Ok(JobStatus::Running),
        "succeeded" => Ok(JobStatus::Succeeded),
        "failed" => Ok(JobStatus::Failed),
        other => anyhow::bail!("unknown status '{}': expected queued, running, succeeded or failed", other),
    }
}

/// The last `limit` lines, or all of them.
fn tail(lines: &[String], limit: Option<usize>) -> &[String] {
    match limit {
        Some(n) if n < lines.len() => &lines[lines.len() - n..],
        _ => lines,
    }
}

pub async fn handle(command: JobCommand, client: &DaemonClient, format: OutputFormat) -> Result<()> {
    match command {
        JobCommand::Submit { inputs, name, bundle_id, project_id, team, retry_of, wait, timeout } => {
            let files = files::collect(&inputs)?;
            if files.is_empty() {
                anyhow::bail!("no source files found in the given inputs");
            }
            let mut request = BuildRequest::new(project_id.unwrap_or_else(|| name.clone()), name, bundle_id, files);
            if let Some(team) = team {
                request = request.development_team(team);
            }
            if let Some(prior) = retry_of {
                request = request.retry_of(JobId::from(prior.as_str()));
            }

            let job = client.submit(request).await?;
            match format {
                OutputFormat::Text => {
                    println!("Submitted {} (attempt {}, {} files)", job.id, job.attempt, job.request.files.len())
                }
                OutputFormat::Json if !wait => println!("{}", serde_json::to_string_pretty(&job)?),
                OutputFormat::Json => {}
            }
            if wait {
                super::wait::handle(client, job.id.as_str(), timeout, format).await?;
            }
        }
        JobCommand::Show { id } => {
            let job = client.get_job(&JobId::from(id.as_str())).await?;
            let Some(job) = job else {
                anyhow::bail!("job not found: {}", id);
            };
            format_or_json(format, &job, || print_job(&job))?;
        }
        JobCommand::Logs { id, limit } => {
            let job = client
                .get_job(&JobId::from(id.as_str()))
                .await?
                .with_context(|| format!("job not found: {id}"))?;
            let lines = tail(&job.logs, limit);
            match format {
                OutputFormat::Text => {
                    if lines.is_empty() {
                        eprintln!("No log lines for job {}", job.id);
                    }
                    for line in lines {
                        println!("{line}");
                    }
                }
                OutputFormat::Json => {
                    let obj = serde_json::json!({ "id": job.id, "status": job.status, "lines": lines });
                    println!("{}", serde_json::to_string_pretty(&obj)?);
                }
            }
        }
        JobCommand::List { status, limit, no_limit } => {
            let mut jobs = client.list_jobs().await?;
            if let Some(status) = status {
                let status = parse_status(&status)?;
                jobs.retain(|j| j.status == status);
            }
            jobs.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
            let truncation = apply_limit(&mut jobs, limit, no_limit);
            handle_list(format, &jobs, "No jobs", truncation, |items, out| format_job_list(out, items))?;
        }
        JobCommand::Wait { id, timeout } => {
            super::wait::handle(client, &id, timeout, format).await?;
        }
        JobCommand::Archive { id, out } => {
            let archive = client.archive(ArchiveSource::Job { id: JobId::from(id.as_str()) }).await?;
            let path = out.unwrap_or_else(|| PathBuf::from(&archive.filename));
            std::fs::write(&path, &archive.bytes).with_context(|| format!("failed to write {}", path.display()))?;
            let obj = serde_json::json!({ "path": path, "bytes": archive.bytes.len() });
            format_or_json(format, &obj, || {
                println!("Wrote {} ({} bytes)", path.display(), archive.bytes.len());
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
