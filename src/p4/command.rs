// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Structured p4 invocation.
//!
//! ```text
//! <program> [global_args...] [-c <client>] <command> [args...]
//!   cwd = workspace root
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use bon::Builder;

use super::ClientName;

/// One p4 invocation, kept as an argument vector.
#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct P4Command {
    #[builder(into)]
    program: PathBuf,
    #[builder(default)]
    global_args: Vec<String>,
    client: Option<ClientName>,
    #[builder(into)]
    command: String,
    #[builder(default)]
    args: Vec<String>,
    #[builder(into)]
    cwd: PathBuf,
}

impl P4Command {
    #[must_use]
    pub const fn program(&self) -> &PathBuf {
        &self.program
    }

    /// The p4 command name (`info`, `clients`, `edit`, ...).
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub const fn client(&self) -> Option<&ClientName> {
        self.client.as_ref()
    }

    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Arguments after the program, in the order p4 expects them.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        let mut argv: Vec<&str> = self.global_args.iter().map(String::as_str).collect();
        if let Some(client) = &self.client {
            argv.push("-c");
            argv.push(client.as_str());
        }
        argv.push(&self.command);
        argv.extend(self.args.iter().map(String::as_str));
        argv
    }
}

impl fmt::Display for P4Command {
    /// Shell-like rendering for logs; arguments with spaces are quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.argv() {
            if arg.is_empty() || arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
