//! # Line Server
//!
//! Reads one JSON command per line and runs each on its own task, so scans
//! of different codes proceed in parallel. Responses are encoded by the
//! command task and written by a single writer task, one line each, in
//! completion order.
//!
//! ```text
//! reader ──spawn──→ task(line) ──mpsc──→ writer ──→ output
//!        ──spawn──→ task(line) ──┘
//! ```
//!
//! On end of input the server waits for every in-flight command before
//! returning.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use crate::handlers::commands::{CommandHandler, Response};

/// Pending responses buffered between command tasks and the writer.
const RESPONSE_BUFFER: usize = 64;

fn encode_line(response: &Response) -> String {
    let mut encoded = serde_json::to_string(response).unwrap_or_else(|e| {
        error!(request_id = %response.request_id, error = %e, "[runtime] response encoding failed");
        serde_json::json!({
            "request_id": response.request_id,
            "ok": false,
            "error": { "kind": "internal", "message": "Could not encode response" },
        })
        .to_string()
    });
    encoded.push('\n');
    encoded
}

/// Serve `input` until it closes, writing responses to `output`.
///
/// Returns the writer once every response has been flushed.
pub async fn serve<R, W>(handler: Arc<CommandHandler>, input: R, output: W) -> Result<W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, mut rx) = mpsc::channel::<String>(RESPONSE_BUFFER);

    let writer = tokio::spawn(async move {
        let mut output = output;
        while let Some(line) = rx.recv().await {
            output
                .write_all(line.as_bytes())
                .await
                .context("Failed to write response")?;
            output.flush().await.context("Failed to flush output")?;
        }
        Ok::<W, anyhow::Error>(output)
    });

    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        let handler = Arc::clone(&handler);
        let tx = tx.clone();
        in_flight.spawn(async move {
            let response = handler.handle_line(&line).await;
            if tx.send(encode_line(&response)).await.is_err() {
                debug!(request_id = %response.request_id, "[runtime] writer gone, response dropped");
            }
        });

        // Reap finished commands so the set stays small on long sessions.
        while let Some(done) = in_flight.try_join_next() {
            if let Err(e) = done {
                error!(error = %e, "[runtime] command task failed");
            }
        }
    }

    info!(in_flight = in_flight.len(), "[runtime] input closed, draining commands");
    while let Some(done) = in_flight.join_next().await {
        if let Err(e) = done {
            error!(error = %e, "[runtime] command task failed");
        }
    }
    drop(tx);

    writer.await.context("Writer task failed")?
}
