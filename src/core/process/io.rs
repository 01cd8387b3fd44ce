// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! I/O streaming and output capture for processes.
//!
//! ```text
//! drive_child()
//!   stdout/stderr reader tasks (drain while the child runs)
//!   wait | timeout (kill) | cancel (kill)
//!   join readers
//!   --> ProcessOutput { stdout, stderr, exit_code, interrupted, timed_out }
//! ```

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Child;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{trace, warn};

use super::builder::{ProcessBuilder, ProcessOutput, StreamFlags};
use crate::error::P4Result;

/// Grace period for reader tasks after the child was killed. Grandchildren
/// may still hold the pipes open.
const KILLED_READER_GRACE: Duration = Duration::from_millis(250);

/// How the wait on the child ended.
#[derive(Clone, Copy)]
enum Outcome {
    Exited(std::process::ExitStatus),
    TimedOut,
    Cancelled,
}

/// Spawns a reader task that drains `stream` into a string.
///
/// Reading never waits on the consumer, so a child writing more than a pipe
/// buffer's worth of output cannot stall.
fn spawn_reader<R>(
    stream: Option<R>,
    flags: StreamFlags,
    process_name: &str,
    stream_name: &'static str,
) -> Option<JoinHandle<String>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    if !flags.intersects(StreamFlags::FORWARD_TO_LOG | StreamFlags::KEEP_IN_STRING) {
        return None;
    }
    let name = process_name.to_string();
    stream.map(|stream| tokio::spawn(read_stream(stream, flags, name, stream_name)))
}

async fn join_reader(handle: Option<JoinHandle<String>>, grace: Option<Duration>) -> String {
    let Some(mut handle) = handle else {
        return String::new();
    };
    match grace {
        None => handle.await.unwrap_or_default(),
        Some(grace) => match tokio::time::timeout(grace, &mut handle).await {
            Ok(joined) => joined.unwrap_or_default(),
            Err(_) => {
                handle.abort();
                String::new()
            }
        },
    }
}

/// Resolves after the optional timeout; pends forever otherwise.
async fn expired(timeout: Option<Duration>) {
    match timeout {
        Some(duration) => tokio::time::sleep(duration).await,
        None => std::future::pending().await,
    }
}

impl ProcessBuilder {
    /// Runs the child to completion, capturing output, honoring timeout and
    /// cancellation.
    pub(super) async fn drive_child(
        &self,
        name: &str,
        child: &mut Child,
        token: CancellationToken,
    ) -> P4Result<ProcessOutput> {
        let stdout_handle = spawn_reader(child.stdout.take(), self.stdout_config(), name, "stdout");
        let stderr_handle = spawn_reader(child.stderr.take(), self.stderr_config(), name, "stderr");

        let outcome = tokio::select! {
            status = child.wait() => Outcome::Exited(status?),
            () = expired(self.timeout_duration()) => Outcome::TimedOut,
            () = token.cancelled() => Outcome::Cancelled,
        };

        let status = match outcome {
            Outcome::Exited(status) => status,
            Outcome::TimedOut => {
                warn!(process = %name, timeout = ?self.timeout_duration(), "process timed out");
                child.kill().await.ok();
                child.wait().await?
            }
            Outcome::Cancelled => {
                warn!(process = %name, "cancellation requested, terminating process");
                child.kill().await.ok();
                child.wait().await?
            }
        };

        let grace = match outcome {
            Outcome::Exited(_) => None,
            Outcome::TimedOut | Outcome::Cancelled => Some(KILLED_READER_GRACE),
        };
        let stdout = join_reader(stdout_handle, grace).await;
        let stderr = join_reader(stderr_handle, grace).await;
        let output = ProcessOutput::new(status.code().unwrap_or(-1), stdout, stderr);

        Ok(match outcome {
            Outcome::Exited(_) => output,
            Outcome::TimedOut => output.mark_timed_out(),
            Outcome::Cancelled => output.mark_interrupted(),
        })
    }
}

/// Drains a stream, forwarding lines to the log and/or keeping the raw bytes.
///
/// Kept output is exactly what the child wrote, line endings included,
/// decoded lossily once the stream closes.
async fn read_stream<R>(
    reader: R,
    flags: StreamFlags,
    process_name: String,
    stream_name: &'static str,
) -> String
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut kept = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                if flags.contains(StreamFlags::FORWARD_TO_LOG) {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    trace!(process = %process_name, stream = %stream_name, line = %line, "output");
                }
                if flags.contains(StreamFlags::KEEP_IN_STRING) {
                    kept.extend_from_slice(&buf);
                }
            }
            Err(e) => {
                warn!(
                    process = %process_name,
                    stream = %stream_name,
                    error = %e,
                    "error reading stream"
                );
                break;
            }
        }
    }

    String::from_utf8_lossy(&kept).into_owned()
}
