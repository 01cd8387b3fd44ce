// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Perforce command-line plumbing.
//!
//! ```text
//!   P4Executor::execute(cwd, command, args, global_args, client)
//!        |
//!        v
//!   P4Command  { program, global_args, -c client, command, args, cwd }
//!        |
//!        v
//!   dyn P4Runner ----> ProcessRunner --> ProcessBuilder --> p4
//!        |             (tests: scripted runners)
//!        v
//!   CommandResult { failed, stdout, stderr }
//!        |
//!        v
//!   parse::parse_info / parse::parse_clients
//! ```
//!
//! The executor never fails on a non-zero exit; only a launch failure is an
//! error. Client-scoped execution (`-c`) is requested by the caller, which is
//! responsible for having a binding first.

pub mod command;
pub mod executor;
pub mod parse;
pub mod runner;

#[cfg(test)]
pub(crate) mod test_utils;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use command::P4Command;
pub use executor::P4Executor;
pub use runner::{CommandResult, P4Runner, ProcessRunner};

/// Name of a Perforce client (workspace specification).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientName(String);

impl ClientName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ClientName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ClientName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ClientName {
    fn from(name: String) -> Self {
        Self(name)
    }
}
