// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Runner seam between the executor and process spawning.

use std::path::Path;
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::P4Command;
use crate::core::process::builder::{ProcessBuilder, ProcessOutput};
use crate::error::P4Result;

/// Outcome of one p4 invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandResult {
    /// Non-zero exit, timeout or cancellation.
    pub failed: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    #[must_use]
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            failed: false,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[must_use]
    pub fn failure(stderr: impl Into<String>) -> Self {
        Self {
            failed: true,
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    #[must_use]
    pub const fn succeeded(&self) -> bool {
        !self.failed
    }

    fn from_output(output: ProcessOutput, timeout: Option<Duration>) -> Self {
        let mut stderr = output.stderr().to_string();
        if output.is_timed_out() {
            let secs = timeout.map_or(0, |t| t.as_secs());
            push_line(&mut stderr, &format!("p4 timed out after {secs} seconds"));
        } else if output.is_interrupted() {
            push_line(&mut stderr, "p4 was cancelled");
        }
        Self {
            failed: !output.success(),
            stdout: output.stdout().to_string(),
            stderr,
        }
    }
}

fn push_line(buf: &mut String, line: &str) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(line);
}

/// Runs a fully described p4 command.
///
/// Implementations resolve `Ok` for every process that was started, whatever
/// its exit status; `Err` is reserved for failing to start one.
pub trait P4Runner: Send + Sync {
    fn run<'a>(&'a self, command: &'a P4Command) -> BoxFuture<'a, P4Result<CommandResult>>;
}

/// Spawns the real p4 executable.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    timeout: Option<Duration>,
    cancel_token: CancellationToken,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(timeout: Option<Duration>, cancel_token: CancellationToken) -> Self {
        Self {
            timeout,
            cancel_token,
        }
    }

    /// Failed result for a working directory that cannot be entered; nothing is spawned.
    fn missing_cwd(cwd: &Path) -> CommandResult {
        CommandResult::failure(format!(
            "working directory '{}' is not an accessible directory",
            cwd.display()
        ))
    }
}

impl P4Runner for ProcessRunner {
    fn run<'a>(&'a self, command: &'a P4Command) -> BoxFuture<'a, P4Result<CommandResult>> {
        Box::pin(async move {
            let cwd_is_dir = tokio::fs::metadata(command.cwd())
                .await
                .is_ok_and(|m| m.is_dir());
            if !cwd_is_dir {
                return Ok(Self::missing_cwd(command.cwd()));
            }

            let mut builder = ProcessBuilder::new(command.program())
                .name("p4")
                .args(command.argv())
                .cwd(command.cwd())
                .capture_output();
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }

            let output = builder
                .run_with_cancellation(self.cancel_token.clone())
                .await?;
            Ok(CommandResult::from_output(output, self.timeout))
        })
    }
}
