// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! Each connection runs on its own task: a `Hello` handshake (checked
//! against the auth token), then any number of requests until the client
//! closes the stream.

mod archive;
mod jobs;

use std::sync::Arc;
use std::time::Instant;

use nb_storage::JobStore;
use nb_wire::{self as protocol, Request, Response};
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::env::{ipc_timeout, DAEMON_VERSION};

/// Shared daemon context for all request handlers.
pub struct ListenCtx {
    pub store: Arc<dyn JobStore>,
    pub start_time: Instant,
    /// When set, clients must provide this token in the Hello handshake.
    pub auth_token: Option<String>,
}

impl ListenCtx {
    pub fn new(store: Arc<dyn JobStore>, auth_token: Option<String>) -> Self {
        Self { store, start_time: Instant::now(), auth_token }
    }
}

/// Listener task for accepting TCP connections.
pub struct Listener {
    tcp: TcpListener,
    ctx: Arc<ListenCtx>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub(crate) enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl Listener {
    pub fn new(tcp: TcpListener, ctx: Arc<ListenCtx>) -> Self {
        Self { tcp, ctx }
    }

    /// Accept connections until `shutdown` is cancelled, spawning a task for each.
    pub async fn run(self, shutdown: CancellationToken) {
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                result = self.tcp.accept() => match result {
                    Ok((stream, addr)) => {
                        debug!("TCP connection from {}", addr);
                        let ctx = Arc::clone(&self.ctx);
                        tokio::spawn(async move {
                            let (reader, writer) = stream.into_split();
                            if let Err(e) = handle_connection(reader, writer, &ctx).await {
                                log_connection_error(e);
                            }
                        });
                    }
                    Err(e) => error!("TCP accept error: {}", e),
                },
            }
        }
        info!("listener stopped");
    }
}

fn log_connection_error(e: ConnectionError) {
    match e {
        ConnectionError::Protocol(protocol::ProtocolError::ConnectionClosed) => {
            debug!("Client disconnected")
        }
        ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
            warn!("Connection timeout")
        }
        _ => error!("Connection error: {}", e),
    }
}

/// Handle a single client connection.
///
/// Generic over reader/writer types so tests can drive it with in-memory
/// streams.
pub(crate) async fn handle_connection<R, W>(mut reader: R, mut writer: W, ctx: &ListenCtx) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    // Connections must authenticate via Hello as the first request
    match protocol::read_request(&mut reader, ipc_timeout()).await? {
        Request::Hello { token, .. } => {
            if let Some(expected) = &ctx.auth_token {
                if token.as_deref() != Some(expected.as_str()) {
                    let response = Response::Error { message: "unauthorized".to_string() };
                    let _ = protocol::write_response(&mut writer, &response, ipc_timeout()).await;
                    return Ok(());
                }
            }
            let response = Response::Hello { version: DAEMON_VERSION.to_string() };
            protocol::write_response(&mut writer, &response, ipc_timeout()).await?;
        }
        _ => {
            let response = Response::Error { message: "connections must start with Hello".to_string() };
            let _ = protocol::write_response(&mut writer, &response, ipc_timeout()).await;
            return Ok(());
        }
    }

    loop {
        // Idle connections wait without a deadline; the handshake already passed.
        let request = match protocol::read_message(&mut reader).await {
            Ok(bytes) => protocol::decode::<Request>(&bytes)?,
            Err(protocol::ProtocolError::ConnectionClosed) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        // Reads are frequent (pollers, idle runners): log them at debug
        if matches!(request, Request::GetJob { .. } | Request::ListJobs | Request::Claim { .. } | Request::Ping) {
            debug!(request = request_name(&request), "received request");
        } else {
            info!(request = request_name(&request), "received request");
        }

        let response = handle_request(request, ctx).await;
        protocol::write_response(&mut writer, &response, ipc_timeout()).await?;
    }
}

fn request_name(request: &Request) -> &'static str {
    match request {
        Request::Hello { .. } => "hello",
        Request::Ping => "ping",
        Request::Submit { .. } => "submit",
        Request::GetJob { .. } => "get_job",
        Request::ListJobs => "list_jobs",
        Request::Claim { .. } => "claim",
        Request::Update { .. } => "update",
        Request::Archive { .. } => "archive",
        Request::Status => "status",
    }
}

/// Handle a single request and return a response.
pub(crate) async fn handle_request(request: Request, ctx: &ListenCtx) -> Response {
    match request {
        Request::Ping => Response::Pong,

        Request::Hello { .. } => Response::Hello { version: DAEMON_VERSION.to_string() },

        Request::Submit { request } => jobs::submit(ctx, request).await,

        Request::GetJob { id } => jobs::get(ctx, &id).await,

        Request::ListJobs => jobs::list(ctx).await,

        Request::Claim { runner } => jobs::claim(ctx, &runner).await,

        Request::Update { id, patch } => jobs::update(ctx, &id, patch).await,

        Request::Archive { source } => archive::handle_archive(ctx, source).await,

        Request::Status => jobs::status(ctx).await,
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
