// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! p4 executor: builds commands, records them to the diagnostic sink, and
//! exposes the typed introspection calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use super::parse::{CLIENTS_FORMAT, ClientRow, ServerInfo, parse_clients, parse_info};
use super::{ClientName, CommandResult, P4Command, P4Runner, ProcessRunner};
use crate::config::types::P4Config;
use crate::core::process::builder::ProcessBuilder;
use crate::error::{P4Result, ProcessError};
use crate::logging::{DIAGNOSTICS, LogReason};

/// Issues p4 commands through a [`P4Runner`].
#[derive(Clone)]
pub struct P4Executor {
    program: PathBuf,
    global_args: Vec<String>,
    runner: Arc<dyn P4Runner>,
}

impl std::fmt::Debug for P4Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("P4Executor")
            .field("program", &self.program)
            .field("global_args", &self.global_args)
            .finish_non_exhaustive()
    }
}

impl P4Executor {
    pub fn new(
        program: impl Into<PathBuf>,
        global_args: Vec<String>,
        runner: Arc<dyn P4Runner>,
    ) -> Self {
        Self {
            program: program.into(),
            global_args,
            runner,
        }
    }

    /// Executor spawning the configured p4 binary.
    ///
    /// A bare program name is looked up on PATH once; if it is missing the
    /// name is kept and the first command reports the launch failure.
    #[must_use]
    pub fn from_config(config: &P4Config, cancel_token: CancellationToken) -> Self {
        let runner = ProcessRunner::new(config.timeout(), cancel_token);
        Self::new(
            resolve_program(&config.program),
            config.global_args(),
            Arc::new(runner),
        )
    }

    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    /// Runs `p4 [global_args] [-c client] command [args]` in `cwd`.
    ///
    /// A non-zero exit comes back as `Ok` with `failed` set.
    ///
    /// # Errors
    ///
    /// Returns `ProcessError::SpawnFailed` if p4 could not be started.
    pub async fn execute(
        &self,
        cwd: &Path,
        command: &str,
        args: &[&str],
        global_args: &[&str],
        client: Option<&ClientName>,
    ) -> P4Result<CommandResult> {
        let command = P4Command::builder()
            .program(self.program.clone())
            .global_args(
                self.global_args
                    .iter()
                    .cloned()
                    .chain(global_args.iter().map(ToString::to_string))
                    .collect(),
            )
            .maybe_client(client.cloned())
            .command(command)
            .args(args.iter().map(ToString::to_string).collect())
            .cwd(cwd)
            .build();

        let line = command.to_string();
        info!(
            target: DIAGNOSTICS,
            reason = LogReason::Command.as_str(),
            cwd = %cwd.display(),
            cmd = %line,
            "p4"
        );

        let result = self.runner.run(&command).await;
        match &result {
            Ok(output) => info!(
                target: DIAGNOSTICS,
                reason = LogReason::Output.as_str(),
                cmd = %line,
                failed = output.failed,
                stdout = %output.stdout,
                stderr = %output.stderr,
                "p4 output"
            ),
            Err(e) => error!(
                target: DIAGNOSTICS,
                reason = LogReason::Output.as_str(),
                cmd = %line,
                error = %e,
                "p4 could not be started"
            ),
        }
        result
    }

    /// `p4 info`, parsed. Needs no client binding.
    ///
    /// # Errors
    ///
    /// Returns an error if p4 cannot be started or reports failure.
    pub async fn info(&self, cwd: &Path) -> P4Result<ServerInfo> {
        let result = self.execute(cwd, "info", &[], &[], None).await?;
        let stdout = into_stdout("info", result)?;
        Ok(parse_info(&stdout))
    }

    /// `p4 -ztag -F <format> clients -u <user>`, parsed.
    ///
    /// # Errors
    ///
    /// Returns an error if p4 cannot be started or reports failure.
    pub async fn clients(&self, cwd: &Path, user: &str) -> P4Result<Vec<ClientRow>> {
        let result = self
            .execute(
                cwd,
                "clients",
                &["-u", user],
                &["-ztag", "-F", CLIENTS_FORMAT],
                None,
            )
            .await?;
        let stdout = into_stdout("clients", result)?;
        Ok(parse_clients(&stdout))
    }
}

fn into_stdout(command: &str, result: CommandResult) -> P4Result<String> {
    if result.failed {
        return Err(ProcessError::P4Failed {
            command: command.to_string(),
            stderr: result.stderr.trim().to_string(),
        }
        .into());
    }
    Ok(result.stdout)
}

/// Resolves a bare program name through PATH; paths are used as given.
fn resolve_program(program: &Path) -> PathBuf {
    let is_bare = program.components().count() == 1;
    if is_bare
        && let Some(found) = program.to_str().and_then(ProcessBuilder::find)
    {
        return found;
    }
    program.to_path_buf()
}
