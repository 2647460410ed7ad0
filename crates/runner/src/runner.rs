// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The claim loop.

use crate::backend::JobBackend;
use crate::config::RunnerConfig;
use crate::executor::{BuildExecutor, ExecError, Invocation};
use crate::scratch::{locate_project, strip_scratch_prefix, ProjectNotFound, Scratch};
use crate::streamer::LogStreamer;
use nb_client::ClientError;
use nb_core::{BuildJob, Clock, JobId, JobPatch, JobStatus, SystemClock};
use nb_diagnostics::extract_errors;
use nb_synth::naming::sanitize_project_name;
use nb_synth::{PackageError, ProjectSpec};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Attempts at delivering a build result before giving up.
const REPORT_ATTEMPTS: u32 = 5;
/// First retry delay for a failed report; doubles each attempt.
const REPORT_BACKOFF: Duration = Duration::from_secs(1);

/// Anything that stops a build before the compiler gives an answer. Each is
/// reported as a failure with no compiler errors.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("packaging failed: {0}")]
    Package(#[from] PackageError),

    #[error("scratch directory error: {0}")]
    Scratch(#[from] std::io::Error),

    #[error(transparent)]
    ProjectNotFound(#[from] ProjectNotFound),

    #[error(transparent)]
    Exec(#[from] ExecError),
}

/// What the compiler said.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BuildOutcome {
    Succeeded,
    Failed { exit_code: i32, compiler_errors: Vec<String> },
}

pub struct Runner<B, E, C: Clock = SystemClock> {
    backend: B,
    executor: E,
    clock: C,
    config: RunnerConfig,
}

impl<B: JobBackend, E: BuildExecutor> Runner<B, E, SystemClock> {
    pub fn new(backend: B, executor: E, config: RunnerConfig) -> Self {
        Self::with_clock(backend, executor, SystemClock, config)
    }
}

impl<B: JobBackend, E: BuildExecutor, C: Clock> Runner<B, E, C> {
    pub fn with_clock(backend: B, executor: E, clock: C, config: RunnerConfig) -> Self {
        Self { backend, executor, clock, config }
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Claim and build until `shutdown` fires.
    ///
    /// Cancellation is observed between jobs; a build in progress runs to
    /// its result. Errors talking to the backend are logged and retried
    /// after the idle interval.
    pub async fn run(&self, shutdown: CancellationToken) {
        tracing::info!(runner = %self.config.runner_id, "runner started");
        while !shutdown.is_cancelled() {
            let idle = match self.run_once().await {
                Ok(Some(_)) => false,
                Ok(None) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "claim failed");
                    true
                }
            };
            if idle {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = self.clock.sleep(self.config.poll_interval) => {}
                }
            }
        }
        tracing::info!(runner = %self.config.runner_id, "runner stopped");
    }

    /// Claim one job and build it. Returns the job as last reported, or
    /// `None` when the queue was empty.
    pub async fn run_once(&self) -> Result<Option<BuildJob>, ClientError> {
        let Some(job) = self.backend.claim(&self.config.runner_id).await? else {
            return Ok(None);
        };
        self.process(job).await.map(Some)
    }

    async fn process(&self, job: BuildJob) -> Result<BuildJob, ClientError> {
        let id = job.id.clone();
        tracing::info!(job_id = %id, project = %job.request.project_name, attempt = job.attempt, "claimed job");

        let mut streamer = LogStreamer::new(self.clock.clone(), self.config.log_flush_interval);
        streamer.push(format!("Claimed by {} (attempt {})", self.config.runner_id, job.attempt));
        self.send_logs(&id, streamer.flush()).await;

        let result = self.build(&job, &mut streamer).await;
        let patch = match result {
            Ok(BuildOutcome::Succeeded) => {
                streamer.push("Build succeeded");
                JobPatch::new().status(JobStatus::Succeeded)
            }
            Ok(BuildOutcome::Failed { exit_code, compiler_errors }) => {
                streamer.push(format!(
                    "Build failed with exit code {exit_code} ({} compiler errors)",
                    compiler_errors.len()
                ));
                let mut patch = JobPatch::new().status(JobStatus::Failed);
                if compiler_errors.is_empty() {
                    patch = patch.error(format!("xcodebuild exited with code {exit_code} without reporting errors"));
                }
                patch.compiler_errors(compiler_errors)
            }
            Err(e) => {
                tracing::warn!(job_id = %id, error = %e, "build could not run");
                streamer.push(format!("Build failed: {e}"));
                JobPatch::new().status(JobStatus::Failed).error(e.to_string()).compiler_errors(Vec::new())
            }
        };

        let patch = patch.logs(streamer.flush().unwrap_or_default());
        let job = self.report(&id, patch).await?;
        tracing::info!(
            job_id = %id,
            status = %job.status,
            compiler_errors = job.compiler_errors.len(),
            "reported job"
        );
        Ok(job)
    }

    /// Send the final status, retrying with backoff. A job whose result never
    /// lands stays `running` on the daemon.
    async fn report(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, ClientError> {
        let mut delay = REPORT_BACKOFF;
        let mut attempt = 1;
        loop {
            match self.backend.update(id, patch.clone()).await {
                Ok(job) => return Ok(job),
                Err(e) if attempt < REPORT_ATTEMPTS => {
                    tracing::warn!(job_id = %id, attempt, error = %e, "report failed, retrying");
                    self.clock.sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(
                        job_id = %id,
                        attempts = attempt,
                        error = %e,
                        "could not report build result, job left running"
                    );
                    return Err(e);
                }
            }
        }
    }

    async fn build(&self, job: &BuildJob, streamer: &mut LogStreamer<C>) -> Result<BuildOutcome, RunnerError> {
        let archive = self.fetch_archive(job).await?;
        let scratch = Scratch::new()?;
        scratch.extract(&archive)?;
        let project_name = sanitize_project_name(&job.request.project_name);
        let project = locate_project(scratch.path(), &project_name)?;
        let scheme = project.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or(project_name);

        let invocation = Invocation::new(&project, scheme, scratch.path());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let exec = self.executor.run(&invocation, tx);
        tokio::pin!(exec);

        let mut output = Vec::new();
        let result = loop {
            // Take what the build has already produced before arming the flush timer
            tokio::select! {
                biased;
                Some(line) = rx.recv() => {
                    self.record(&job.id, &scratch, line, streamer, &mut output).await;
                    continue;
                }
                result = &mut exec => break result,
                _ = std::future::ready(()) => {}
            }
            let wait = streamer.until_due();
            tokio::select! {
                biased;
                Some(line) = rx.recv() => self.record(&job.id, &scratch, line, streamer, &mut output).await,
                result = &mut exec => break result,
                _ = async { self.clock.sleep(wait.unwrap_or_default()).await }, if wait.is_some() => {
                    self.send_logs(&job.id, streamer.due()).await;
                }
            }
        };
        while let Ok(line) = rx.try_recv() {
            self.record(&job.id, &scratch, line, streamer, &mut output).await;
        }

        let exit_code = result?;
        if exit_code == 0 {
            return Ok(BuildOutcome::Succeeded);
        }
        let compiler_errors = extract_errors(&output.join("\n"), self.config.max_compiler_errors);
        Ok(BuildOutcome::Failed { exit_code, compiler_errors })
    }

    async fn record(
        &self,
        id: &JobId,
        scratch: &Scratch,
        line: String,
        streamer: &mut LogStreamer<C>,
        output: &mut Vec<String>,
    ) {
        let line = strip_scratch_prefix(&line, scratch.path());
        output.push(line.clone());
        let batch = streamer.push(line);
        self.send_logs(id, batch).await;
    }

    /// The daemon's archive, or a local re-export of the job's files when
    /// the daemon cannot supply one.
    async fn fetch_archive(&self, job: &BuildJob) -> Result<Vec<u8>, PackageError> {
        match self.backend.archive(job).await {
            Ok(bytes) => Ok(bytes),
            Err(e) => {
                tracing::warn!(job_id = %job.id, error = %e, "archive fetch failed, packaging locally");
                let spec = ProjectSpec::from_request(&job.request);
                let (_, package) = nb_synth::export(&job.request.files, &spec)?;
                Ok(package.bytes)
            }
        }
    }

    async fn send_logs(&self, id: &JobId, batch: Option<Vec<String>>) {
        let Some(lines) = batch else {
            return;
        };
        let count = lines.len();
        if let Err(e) = self.backend.update(id, JobPatch::new().logs(lines)).await {
            tracing::warn!(job_id = %id, lines = count, error = %e, "dropped log batch");
        }
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;
