// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Length-prefixed JSON framing.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::{Request, Response};

/// Largest payload either side will read or write (64 MiB).
pub const MAX_MESSAGE_BYTES: usize = 64 * 1024 * 1024;

/// Errors from framing, encoding or transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("message of {size} bytes exceeds the {max} byte limit")]
    MessageTooLarge { size: usize, max: usize },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timed out")]
    Timeout,
}

/// Serialize a message to JSON, without the length prefix.
pub fn encode<T: Serialize>(message: &T) -> Result<Vec<u8>, ProtocolError> {
    Ok(serde_json::to_vec(message)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProtocolError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Read one length-prefixed frame.
///
/// EOF before the prefix is [`ProtocolError::ConnectionClosed`].
pub async fn read_message<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Vec<u8>, ProtocolError> {
    let mut prefix = [0u8; 4];
    if let Err(e) = reader.read_exact(&mut prefix).await {
        if e.kind() == std::io::ErrorKind::UnexpectedEof {
            return Err(ProtocolError::ConnectionClosed);
        }
        return Err(e.into());
    }
    let size = u32::from_be_bytes(prefix) as usize;
    if size > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge { size, max: MAX_MESSAGE_BYTES });
    }
    let mut buf = vec![0u8; size];
    reader.read_exact(&mut buf).await?;
    Ok(buf)
}

/// Write one length-prefixed frame and flush.
pub async fn write_message<W: AsyncWrite + Unpin>(writer: &mut W, data: &[u8]) -> Result<(), ProtocolError> {
    if data.len() > MAX_MESSAGE_BYTES {
        return Err(ProtocolError::MessageTooLarge { size: data.len(), max: MAX_MESSAGE_BYTES });
    }
    let size = data.len() as u32;
    writer.write_all(&size.to_be_bytes()).await?;
    writer.write_all(data).await?;
    writer.flush().await?;
    Ok(())
}

async fn with_timeout<T>(
    timeout: Duration,
    fut: impl std::future::Future<Output = Result<T, ProtocolError>>,
) -> Result<T, ProtocolError> {
    tokio::time::timeout(timeout, fut).await.map_err(|_| ProtocolError::Timeout)?
}

async fn read_typed<R, T>(reader: &mut R, timeout: Duration) -> Result<T, ProtocolError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let bytes = with_timeout(timeout, read_message(reader)).await?;
    decode(&bytes)
}

async fn write_typed<W, T>(writer: &mut W, message: &T, timeout: Duration) -> Result<(), ProtocolError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let bytes = encode(message)?;
    with_timeout(timeout, write_message(writer, &bytes)).await
}

pub async fn read_request<R: AsyncRead + Unpin>(reader: &mut R, timeout: Duration) -> Result<Request, ProtocolError> {
    read_typed(reader, timeout).await
}

pub async fn write_request<W: AsyncWrite + Unpin>(
    writer: &mut W,
    request: &Request,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    write_typed(writer, request, timeout).await
}

pub async fn read_response<R: AsyncRead + Unpin>(
    reader: &mut R,
    timeout: Duration,
) -> Result<Response, ProtocolError> {
    read_typed(reader, timeout).await
}

pub async fn write_response<W: AsyncWrite + Unpin>(
    writer: &mut W,
    response: &Response,
    timeout: Duration,
) -> Result<(), ProtocolError> {
    write_typed(writer, response, timeout).await
}

#[cfg(test)]
#[path = "wire_tests.rs"]
mod tests;
