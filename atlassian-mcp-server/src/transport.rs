//! Line-delimited stdio transport for the MCP service
//!
//! One JSON-RPC message per line in each direction. A reader task decodes
//! input lines into MCP messages for the service; a single writer task owns the
//! output. Lines that can never become an MCP message (invalid UTF-8, invalid
//! JSON, wrong `jsonrpc` version, unknown methods, malformed params) are
//! answered here with a JSON-RPC error and the session carries on.

use futures::channel::mpsc as inbound;
use futures::Sink;
use rmcp::model::ErrorCode;
use rmcp::service::{RxJsonRpcMessage, TxJsonRpcMessage};
use rmcp::RoleServer;
use serde_json::{json, Value};
use std::pin::Pin;
use std::task::{Context, Poll};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Methods the service answers; a malformed call to one of these is -32602
const SERVED_METHODS: &[&str] = &["initialize", "ping", "tools/list", "tools/call"];

/// Failure to hand an outgoing message to the writer task
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Output channel closed")]
    Closed,

    #[error("Failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Message stream consumed by the MCP service
pub type LineStream = inbound::UnboundedReceiver<RxJsonRpcMessage<RoleServer>>;

/// Outgoing half: serializes service messages onto the writer task's queue
pub struct LineSink {
    outbound: mpsc::UnboundedSender<String>,
}

impl Sink<TxJsonRpcMessage<RoleServer>> for LineSink {
    type Error = TransportError;

    fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        if self.outbound.is_closed() {
            Poll::Ready(Err(TransportError::Closed))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn start_send(
        self: Pin<&mut Self>,
        message: TxJsonRpcMessage<RoleServer>,
    ) -> Result<(), Self::Error> {
        let line = serde_json::to_string(&message)?;
        self.outbound
            .send(line)
            .map_err(|_| TransportError::Closed)
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }
}

/// Reader and writer tasks behind a transport
pub struct LineTasks {
    reader: JoinHandle<()>,
    writer: JoinHandle<std::io::Result<()>>,
}

impl LineTasks {
    /// Stop reading and wait until every queued line has been written
    ///
    /// Call after the service has stopped, so its sink is already dropped.
    pub async fn finish(self) -> anyhow::Result<()> {
        self.reader.abort();
        self.writer.await??;
        Ok(())
    }
}

/// Spawn the reader and writer tasks over `reader`/`writer`
///
/// The `(sink, stream)` pair is an rmcp transport.
pub fn spawn<R, W>(reader: R, writer: W) -> ((LineSink, LineStream), LineTasks)
where
    R: AsyncRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel::<String>();
    let (inbound_tx, inbound_rx) = inbound::unbounded();

    let tasks = LineTasks {
        reader: tokio::spawn(read_lines(reader, inbound_tx, outbound_tx.clone())),
        writer: tokio::spawn(write_lines(writer, outbound_rx)),
    };
    let sink = LineSink {
        outbound: outbound_tx,
    };

    ((sink, inbound_rx), tasks)
}

async fn read_lines<R>(
    reader: R,
    messages: inbound::UnboundedSender<RxJsonRpcMessage<RoleServer>>,
    replies: mpsc::UnboundedSender<String>,
) where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();

    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Failed to read input: {}", e);
                break;
            }
        }

        let sent = match decode(&line) {
            Decoded::Message(message) => messages.unbounded_send(*message).is_ok(),
            Decoded::Reject(reply) => replies.send(reply).is_ok(),
            Decoded::Skip => true,
        };
        if !sent {
            break;
        }
    }

    debug!("Input closed");
}

async fn write_lines<W>(
    mut writer: W,
    mut lines: mpsc::UnboundedReceiver<String>,
) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(mut line) = lines.recv().await {
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
    }
    Ok(())
}

/// What to do with one input line
#[derive(Debug)]
enum Decoded {
    /// Hand to the service
    Message(Box<RxJsonRpcMessage<RoleServer>>),
    /// Answer directly with this serialized error response
    Reject(String),
    /// Blank line, or an unusable notification
    Skip,
}

fn decode(line: &[u8]) -> Decoded {
    let text = match std::str::from_utf8(line) {
        Ok(text) => text.trim(),
        Err(e) => {
            warn!("Input line is not UTF-8: {}", e);
            return reject(Value::Null, ErrorCode::PARSE_ERROR, format!("Parse error: {}", e));
        }
    };
    if text.is_empty() {
        return Decoded::Skip;
    }

    let message: Value = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!("Unparseable message: {}", e);
            return reject(Value::Null, ErrorCode::PARSE_ERROR, format!("Parse error: {}", e));
        }
    };

    // Notifications are never answered, even when malformed
    let id = message.get("id").filter(|id| !id.is_null()).cloned();
    let method = message.get("method").and_then(Value::as_str);

    if message.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
        return match id {
            Some(id) => reject(
                id,
                ErrorCode::INVALID_REQUEST,
                "Invalid Request: jsonrpc must be \"2.0\"".to_string(),
            ),
            None => Decoded::Skip,
        };
    }

    match serde_json::from_value::<RxJsonRpcMessage<RoleServer>>(message.clone()) {
        Ok(decoded) => Decoded::Message(Box::new(decoded)),
        Err(e) => match (id, method) {
            (None, method) => {
                debug!(?method, "Ignoring notification: {}", e);
                Decoded::Skip
            }
            (Some(id), Some(method)) if SERVED_METHODS.contains(&method) => reject(
                id,
                ErrorCode::INVALID_PARAMS,
                format!("Invalid params: {}", e),
            ),
            (Some(id), Some(method)) => {
                warn!("Unknown method: {}", method);
                reject(
                    id,
                    ErrorCode::METHOD_NOT_FOUND,
                    format!("Method not found: {}", method),
                )
            }
            (Some(id), None) => reject(
                id,
                ErrorCode::INVALID_REQUEST,
                format!("Invalid Request: {}", e),
            ),
        },
    }
}

fn reject(id: Value, code: ErrorCode, message: String) -> Decoded {
    let reply = json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": code.0, "message": message }
    });
    Decoded::Reject(reply.to_string())
}
