// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared test utilities: a scripted p4 runner and log capture.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

use super::{CommandResult, P4Command, P4Executor, P4Runner};
use crate::error::{P4Result, ProcessError};

#[derive(Clone)]
enum Scripted {
    Result(CommandResult),
    LaunchFailure,
}

/// Answers p4 commands from a table keyed by command name and records every call.
#[derive(Default)]
pub(crate) struct ScriptedRunner {
    responses: HashMap<String, Scripted>,
    delay: Option<Duration>,
    calls: Mutex<Vec<P4Command>>,
}

impl ScriptedRunner {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(mut self, command: &str, result: CommandResult) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::Result(result));
        self
    }

    pub(crate) fn fail_launch(mut self, command: &str) -> Self {
        self.responses
            .insert(command.to_string(), Scripted::LaunchFailure);
        self
    }

    /// Delays every answer, to keep resolutions in flight.
    pub(crate) const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<P4Command> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub(crate) fn count(&self, command: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.command() == command)
            .count()
    }
}

impl P4Runner for ScriptedRunner {
    fn run<'a>(&'a self, command: &'a P4Command) -> BoxFuture<'a, P4Result<CommandResult>> {
        Box::pin(async move {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(command.clone());
            }
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match self.responses.get(command.command()) {
                Some(Scripted::Result(result)) => Ok(result.clone()),
                Some(Scripted::LaunchFailure) => Err(ProcessError::SpawnFailed {
                    command: command.to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "p4 not found"),
                }
                .into()),
                None => Ok(CommandResult::failure(format!(
                    "Unknown command.  Try 'p4 help' for info: {}",
                    command.command()
                ))),
            }
        })
    }
}

/// Executor over `runner` with program `p4` and no global args.
pub(crate) fn executor(runner: &Arc<ScriptedRunner>) -> P4Executor {
    P4Executor::new("p4", Vec::new(), runner.clone())
}

#[derive(Clone)]
struct BufferWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer
            .lock()
            .map_err(|_| std::io::Error::other("buffer poisoned"))?
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone)]
struct BufferMakeWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl<'a> MakeWriter<'a> for BufferMakeWriter {
    type Writer = BufferWriter;

    fn make_writer(&'a self) -> Self::Writer {
        BufferWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Runs an async closure while capturing tracing output at INFO and above.
///
/// Returns the closure's value and the captured log text.
pub(crate) async fn run_with_logs<F, Fut, T>(f: F) -> (T, String)
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = T>,
{
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_writer(BufferMakeWriter {
            buffer: buffer.clone(),
        })
        .with_max_level(Level::INFO)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .finish();

    let value = {
        let _guard = tracing::subscriber::set_default(subscriber);
        f().await
    };

    let logs = buffer
        .lock()
        .map(|b| String::from_utf8_lossy(&b).to_string())
        .unwrap_or_default();
    (value, logs)
}
