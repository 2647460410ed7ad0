// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Native compiler invocation.
//!
//! [`BuildExecutor`] runs one build and forwards its output line by line;
//! [`XcodebuildExecutor`] is the real implementation.

use crate::toolchain::{locate_xcodebuild, ToolchainNotFound};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

/// Simulator destination; needs no device or signing identity.
pub const DESTINATION: &str = "generic/platform=iOS Simulator";
pub const CONFIGURATION: &str = "Debug";

#[derive(Debug, Error)]
pub enum ExecError {
    #[error(transparent)]
    ToolchainNotFound(#[from] ToolchainNotFound),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("build exceeded {}s and was killed", .0.as_secs())]
    TimedOut(Duration),

    #[error("build process I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One build of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Path to the `.xcodeproj` bundle.
    pub project: PathBuf,
    pub scheme: String,
    /// Working directory; also receives derived data.
    pub work_dir: PathBuf,
}

impl Invocation {
    pub fn new(project: impl Into<PathBuf>, scheme: impl Into<String>, work_dir: impl Into<PathBuf>) -> Self {
        Self { project: project.into(), scheme: scheme.into(), work_dir: work_dir.into() }
    }

    pub fn derived_data(&self) -> PathBuf {
        self.work_dir.join("DerivedData")
    }

    /// Fixed argument set: Debug, simulator destination, signing disabled,
    /// derived data kept inside the work dir.
    pub fn args(&self) -> Vec<String> {
        vec![
            "-project".to_string(),
            self.project.display().to_string(),
            "-scheme".to_string(),
            self.scheme.clone(),
            "-configuration".to_string(),
            CONFIGURATION.to_string(),
            "-destination".to_string(),
            DESTINATION.to_string(),
            "-derivedDataPath".to_string(),
            self.derived_data().display().to_string(),
            "build".to_string(),
            "CODE_SIGNING_ALLOWED=NO".to_string(),
            "CODE_SIGNING_REQUIRED=NO".to_string(),
            "CODE_SIGN_IDENTITY=".to_string(),
        ]
    }
}

#[async_trait]
pub trait BuildExecutor: Send + Sync {
    /// Run the build, sending each stdout/stderr line to `lines`, and return
    /// the process exit code.
    async fn run(&self, invocation: &Invocation, lines: mpsc::UnboundedSender<String>) -> Result<i32, ExecError>;
}

/// Runs the real `xcodebuild`, killing it after `timeout`.
#[derive(Debug, Clone)]
pub struct XcodebuildExecutor {
    program: Option<PathBuf>,
    timeout: Duration,
}

impl XcodebuildExecutor {
    pub fn new(program: Option<PathBuf>, timeout: Duration) -> Self {
        Self { program, timeout }
    }
}

#[async_trait]
impl BuildExecutor for XcodebuildExecutor {
    async fn run(&self, invocation: &Invocation, lines: mpsc::UnboundedSender<String>) -> Result<i32, ExecError> {
        let program = locate_xcodebuild(self.program.as_deref())?;
        run_process(&program, &invocation.args(), &invocation.work_dir, self.timeout, lines).await
    }
}

/// Spawn `program`, stream both output pipes into `lines` and wait for it
/// under `timeout`. The child is killed if the wait times out or the future
/// is dropped.
pub async fn run_process(
    program: &Path,
    args: &[String],
    cwd: &Path,
    timeout: Duration,
    lines: mpsc::UnboundedSender<String>,
) -> Result<i32, ExecError> {
    let start = Instant::now();
    let mut cmd = Command::new(program);
    cmd.args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    #[cfg(unix)]
    cmd.process_group(0);

    let mut child = cmd
        .spawn()
        .map_err(|source| ExecError::Spawn { program: program.display().to_string(), source })?;
    tracing::info!(program = %program.display(), pid = ?child.id(), "build started");

    let stdout = child.stdout.take().map(|out| tokio::spawn(forward(out, lines.clone())));
    let stderr = child.stderr.take().map(|err| tokio::spawn(forward(err, lines)));

    let status = match tokio::time::timeout(timeout, child.wait()).await {
        Ok(status) => status?,
        Err(_) => {
            if let Err(e) = child.kill().await {
                tracing::warn!(error = %e, "failed to kill timed out build");
            }
            tracing::warn!(timeout_secs = timeout.as_secs(), "build timed out");
            return Err(ExecError::TimedOut(timeout));
        }
    };

    // Drain both pipes before reporting so no trailing output is lost
    for reader in [stdout, stderr].into_iter().flatten() {
        if let Err(e) = reader.await {
            tracing::warn!(error = %e, "output reader task failed");
        }
    }

    // Killed by a signal
    let exit_code = status.code().unwrap_or(-1);
    tracing::info!(exit_code, duration_ms = start.elapsed().as_millis() as u64, "build finished");
    Ok(exit_code)
}

async fn forward<R>(reader: R, lines: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader).lines();
    loop {
        match reader.next_line().await {
            Ok(Some(line)) => {
                if lines.send(line).is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::debug!(error = %e, "stopped reading build output");
                break;
            }
        }
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
