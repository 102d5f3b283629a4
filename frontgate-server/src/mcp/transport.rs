// Copyright 2025 AgentReplay (https://github.com/agentreplay)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! MCP transport abstraction (stdio/buffer).
//!
//! Transports take `&self` so the read loop and any number of in-flight
//! handlers can share one transport behind an `Arc`. Writes are serialized
//! by a lock; a response is always written as one whole line.

use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use std::io;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::{mpsc, Mutex};

/// Transport-level errors.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid JSON-RPC request")]
    InvalidRequest(Box<JsonRpcResponse>),
    #[error("Channel closed")]
    ChannelClosed,
}

/// Transport abstraction for MCP JSON-RPC messages.
#[async_trait::async_trait]
pub trait McpTransport: Send + Sync {
    /// Receive the next message; `None` once the peer has closed its side.
    ///
    /// Must be cancel safe: a partially read message is kept for the next call.
    async fn recv(&self) -> Result<Option<JsonRpcRequest>, TransportError>;
    /// Send a JSON-RPC response.
    async fn send(&self, response: &JsonRpcResponse) -> Result<(), TransportError>;
}

struct LineReader<R> {
    inner: BufReader<R>,
    pending: Vec<u8>,
}

/// Newline-delimited JSON over any byte stream
pub struct LineTransport<R, W> {
    reader: Mutex<LineReader<R>>,
    writer: Mutex<W>,
}

/// Stdio transport: one JSON-RPC message per line
pub type StdioTransport = LineTransport<Stdin, Stdout>;

impl<R, W> LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: Mutex::new(LineReader {
                inner: BufReader::new(reader),
                pending: Vec::new(),
            }),
            writer: Mutex::new(writer),
        }
    }
}

impl LineTransport<Stdin, Stdout> {
    /// Create a new stdio transport.
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), tokio::io::stdout())
    }
}

#[async_trait::async_trait]
impl<R, W> McpTransport for LineTransport<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn recv(&self) -> Result<Option<JsonRpcRequest>, TransportError> {
        let mut guard = self.reader.lock().await;
        let LineReader { inner, pending } = &mut *guard;

        loop {
            // read_until keeps partial input in `pending` if this future is dropped
            let read = inner.read_until(b'\n', pending).await?;
            if read == 0 && pending.is_empty() {
                return Ok(None);
            }

            let line = std::mem::take(pending);
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            let message: serde_json::Value = serde_json::from_slice(&line)?;
            return JsonRpcRequest::from_message(message)
                .map(Some)
                .map_err(|response| TransportError::InvalidRequest(Box::new(response)));
        }
    }

    async fn send(&self, response: &JsonRpcResponse) -> Result<(), TransportError> {
        let mut payload = serde_json::to_vec(response)?;
        payload.push(b'\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(&payload).await?;
        writer.flush().await?;
        Ok(())
    }
}

/// Buffer-backed transport for tests and in-process use.
pub struct BufferTransport {
    input: Mutex<mpsc::Receiver<JsonRpcRequest>>,
    output: mpsc::Sender<JsonRpcResponse>,
}

impl BufferTransport {
    pub fn new(input: mpsc::Receiver<JsonRpcRequest>, output: mpsc::Sender<JsonRpcResponse>) -> Self {
        Self {
            input: Mutex::new(input),
            output,
        }
    }

    /// A transport plus the peer ends of its channels. Dropping the request
    /// sender ends the session.
    pub fn channel(
        capacity: usize,
    ) -> (Self, mpsc::Sender<JsonRpcRequest>, mpsc::Receiver<JsonRpcResponse>) {
        let (request_tx, request_rx) = mpsc::channel(capacity);
        let (response_tx, response_rx) = mpsc::channel(capacity);
        (Self::new(request_rx, response_tx), request_tx, response_rx)
    }
}

#[async_trait::async_trait]
impl McpTransport for BufferTransport {
    async fn recv(&self) -> Result<Option<JsonRpcRequest>, TransportError> {
        let mut guard = self.input.lock().await;
        Ok(guard.recv().await)
    }

    async fn send(&self, response: &JsonRpcResponse) -> Result<(), TransportError> {
        self.output
            .send(response.clone())
            .await
            .map_err(|_| TransportError::ChannelClosed)
    }
}
