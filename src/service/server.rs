// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Request loop behind `p4ws serve`.
//!
//! ```text
//! input lines --> Envelope --> JoinSet task (bounded by a semaphore) --+
//!                                                                     |
//! output      <-- writer task <-- flume channel <-- Response <--------+
//! ```
//!
//! Reading stops at end of input, on `shutdown`, or when the cancellation
//! token fires. In-flight requests are always drained before returning.

use std::sync::Arc;

use anyhow::Context;
use bon::Builder;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use super::WorkspaceService;
use super::protocol::{
    BindingReport, BindingsReport, DocumentReport, EditReport, Envelope, Request, Response,
    RootReport, RootsReport,
};
use crate::error::Result;

fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(4)
}

/// Serves one request stream against a shared [`WorkspaceService`].
#[derive(Debug, Builder)]
pub struct Server {
    service: Arc<WorkspaceService>,
    #[builder(default)]
    cancel_token: CancellationToken,
    /// Requests handled at the same time.
    #[builder(default = default_concurrency())]
    max_concurrent: usize,
}

impl Server {
    /// Reads requests from `input` until it ends, writing responses to `output`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading `input` or writing `output` fails.
    pub async fn run<R, W>(self, input: R, output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, rx) = flume::unbounded::<Response>();
        let writer = tokio::spawn(write_responses(rx, output));

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent.max(1)));
        let mut tasks = JoinSet::new();
        let mut lines = input.lines();
        let mut shutdown: Option<Option<Value>> = None;

        loop {
            let line = tokio::select! {
                () = self.cancel_token.cancelled() => {
                    debug!("serve cancelled");
                    break;
                }
                line = lines.next_line() => line.context("failed to read request")?,
            };
            let Some(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let envelope: Envelope = match serde_json::from_str(line) {
                Ok(envelope) => envelope,
                Err(e) => {
                    warn!(error = %e, "invalid request");
                    let _ = tx.send(Response::error(None, format!("invalid request: {e}")));
                    continue;
                }
            };
            debug!(method = envelope.request.method(), "request");

            if envelope.request == Request::Shutdown {
                shutdown = Some(envelope.id);
                break;
            }

            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .context("request limiter closed")?;
            let service = Arc::clone(&self.service);
            let tx = tx.clone();
            tasks.spawn(async move {
                let response = handle(&service, envelope).await;
                drop(permit);
                let _ = tx.send(response);
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!(error = %e, "request handler panicked");
            }
        }
        if let Some(id) = shutdown {
            let _ = tx.send(Response::success(id, &serde_json::json!({})));
        }
        drop(tx);

        writer
            .await
            .context("response writer panicked")?
            .context("failed to write response")?;
        Ok(())
    }
}

async fn handle(service: &WorkspaceService, envelope: Envelope) -> Response {
    let id = envelope.id;
    match envelope.request {
        Request::RootsChanged { added, removed } => {
            let roots = service
                .notify_workspace_roots_changed(&added, &removed)
                .await
                .into_iter()
                .map(RootReport::from)
                .collect();
            Response::success(id, &RootsReport { roots })
        }
        Request::DocumentOpened { path } => {
            let root = service
                .notify_document_opened(&path)
                .await
                .map(RootReport::from);
            Response::success(id, &DocumentReport { root })
        }
        Request::EnsureEditable { path } => {
            let report = EditReport::from(service.prepare_for_edit(&path).await);
            if let Some(reason) = &report.reason {
                warn!(file = %path.display(), error = %reason, "file could not be made editable");
            }
            Response::success(id, &report)
        }
        Request::Binding { root } => {
            let binding = service.state(&root);
            Response::success(id, &BindingReport { root, binding })
        }
        Request::Bindings => {
            let bindings = service
                .resolver()
                .states()
                .into_iter()
                .map(|(root, binding)| BindingReport { root, binding })
                .collect();
            Response::success(id, &BindingsReport { bindings })
        }
        Request::Shutdown => Response::error(id, "shutdown is handled by the request loop"),
    }
}

async fn write_responses<W>(rx: flume::Receiver<Response>, mut output: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Ok(response) = rx.recv_async().await {
        let mut line = serde_json::to_vec(&response)?;
        line.push(b'\n');
        output.write_all(&line).await?;
        output.flush().await?;
    }
    Ok(())
}
