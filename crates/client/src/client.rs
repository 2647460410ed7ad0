// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! TCP client for the build daemon.
//!
//! Each call opens a connection, authenticates with `Hello`, sends one
//! request and reads one response.

use std::time::Duration;

use async_trait::async_trait;
use nb_core::{BuildJob, BuildRequest, JobId, JobPatch};
use nb_wire::{
    read_response, write_request, ArchiveSource, DaemonStatus, JobSummary, ProtocolError, Request, Response,
    PROTOCOL_VERSION,
};
use thiserror::Error;
use tokio::net::TcpStream;

use crate::env;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not connect to daemon at {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error("daemon error: {0}")]
    Rejected(String),

    #[error("unexpected response from daemon: {0}")]
    UnexpectedResponse(String),
}

/// A packaged project downloaded from the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub filename: String,
    pub content_disposition: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct DaemonClient {
    addr: String,
    token: Option<String>,
    timeout: Duration,
}

impl DaemonClient {
    pub fn new(addr: impl Into<String>) -> Self {
        Self { addr: addr.into(), token: None, timeout: env::ipc_timeout() }
    }

    /// Endpoint, token and timeout from `NB_*` environment variables.
    pub fn from_env() -> Self {
        let mut client = Self::new(env::daemon_addr());
        client.token = env::auth_token();
        client
    }

    nb_core::setters! {
        set {
            timeout: Duration,
        }
        option {
            token: String,
        }
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Send one request and return the daemon's answer.
    ///
    /// `Response::Error` becomes [`ClientError::Rejected`].
    pub async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let stream = TcpStream::connect(&self.addr)
            .await
            .map_err(|source| ClientError::Connect { addr: self.addr.clone(), source })?;
        let (mut reader, mut writer) = stream.into_split();

        let hello = Request::Hello { version: PROTOCOL_VERSION.to_string(), token: self.token.clone() };
        write_request(&mut writer, &hello, self.timeout).await?;
        match read_response(&mut reader, self.timeout).await? {
            Response::Hello { .. } => {}
            other => return Self::reject(other),
        }

        write_request(&mut writer, request, self.timeout).await?;
        match read_response(&mut reader, self.timeout).await? {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            response => Ok(response),
        }
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { message } => Err(ClientError::Rejected(message)),
            other => Err(ClientError::UnexpectedResponse(format!("{other:?}"))),
        }
    }

    /// Daemon version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        let request = Request::Hello { version: PROTOCOL_VERSION.to_string(), token: self.token.clone() };
        match self.send(&request).await? {
            Response::Hello { version } => Ok(version),
            other => Self::reject(other),
        }
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(&Request::Ping).await? {
            Response::Pong => Ok(()),
            other => Self::reject(other),
        }
    }

    pub async fn submit(&self, request: BuildRequest) -> Result<BuildJob, ClientError> {
        match self.send(&Request::Submit { request }).await? {
            Response::Submitted { job } => Ok(*job),
            other => Self::reject(other),
        }
    }

    pub async fn get_job(&self, id: &JobId) -> Result<Option<BuildJob>, ClientError> {
        match self.send(&Request::GetJob { id: id.clone() }).await? {
            Response::Job { job } => Ok(job.map(|b| *b)),
            other => Self::reject(other),
        }
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobSummary>, ClientError> {
        match self.send(&Request::ListJobs).await? {
            Response::Jobs { jobs } => Ok(jobs),
            other => Self::reject(other),
        }
    }

    /// Claim the oldest queued job for `runner`; `None` when nothing is queued.
    pub async fn claim(&self, runner: &str) -> Result<Option<BuildJob>, ClientError> {
        match self.send(&Request::Claim { runner: runner.to_string() }).await? {
            Response::Claimed { job } => Ok(job.map(|b| *b)),
            other => Self::reject(other),
        }
    }

    pub async fn update(&self, id: &JobId, patch: JobPatch) -> Result<BuildJob, ClientError> {
        match self.send(&Request::Update { id: id.clone(), patch }).await? {
            Response::Updated { job } => Ok(*job),
            other => Self::reject(other),
        }
    }

    pub async fn archive(&self, source: ArchiveSource) -> Result<Archive, ClientError> {
        match self.send(&Request::Archive { source }).await? {
            Response::Archive { filename, content_disposition, bytes } => {
                Ok(Archive { filename, content_disposition, bytes })
            }
            other => Self::reject(other),
        }
    }

    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(&Request::Status).await? {
            Response::Status(status) => Ok(status),
            other => Self::reject(other),
        }
    }
}

/// Read access to jobs, for the poll loop.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn fetch_job(&self, id: &JobId) -> Result<Option<BuildJob>, ClientError>;
}

#[async_trait]
impl JobSource for DaemonClient {
    async fn fetch_job(&self, id: &JobId) -> Result<Option<BuildJob>, ClientError> {
        self.get_job(id).await
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
