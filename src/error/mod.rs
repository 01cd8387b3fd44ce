// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!               P4Error (16 bytes)
//!                     |
//!   +---------+-------+-------+---------+
//!   |         |       |       |         |
//!   v         v       v       v         v
//! Workspace Process Parse   Config     Io
//!   Box       Box    Box     Box      Box
//!
//! Sub-errors (unboxed internally):
//!   Workspace NoWorkspaceFolder, NoClientBinding, ResolutionFailed
//!   Process   SpawnFailed, P4Failed
//!   Parse     Incomplete
//!   Config    ReadError, ParseError, InvalidValue
//! ```

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`P4Error`].
pub type P4Result<T> = std::result::Result<T, P4Error>;

/// Top-level library error type.
///
/// All sub-errors are boxed to keep this enum at two words on the stack.
#[derive(Debug, Error)]
pub enum P4Error {
    /// Workspace lookup or client resolution failed.
    #[error("workspace error: {0}")]
    Workspace(#[from] Box<WorkspaceError>),

    /// External process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// p4 output did not carry the data a caller needed.
    #[error("parse error: {0}")]
    Parse(#[from] Box<ParseError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for P4Error {
                fn from(err: $error) -> Self {
                    P4Error::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    WorkspaceError => Workspace,
    ProcessError => Process,
    ParseError => Parse,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Workspace Errors ---

/// Errors raised while mapping paths to workspaces and clients.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    /// The path is not under any registered workspace root.
    #[error("no workspace folder contains '{}'", path.display())]
    NoWorkspaceFolder { path: PathBuf },

    /// A client-scoped command was attempted before the root was bound.
    #[error("no perforce client bound to workspace '{}'", root.display())]
    NoClientBinding { root: PathBuf },

    /// Every resolution strategy came up empty.
    #[error("no client found for workspace '{}'", root.display())]
    ResolutionFailed { root: PathBuf },
}

impl WorkspaceError {
    pub(crate) fn no_folder(path: &Path) -> Self {
        Self::NoWorkspaceFolder {
            path: path.to_path_buf(),
        }
    }

    pub(crate) fn no_binding(root: &Path) -> Self {
        Self::NoClientBinding {
            root: root.to_path_buf(),
        }
    }

    pub(crate) fn unresolved(root: &Path) -> Self {
        Self::ResolutionFailed {
            root: root.to_path_buf(),
        }
    }
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// p4 ran but reported failure; carries its stderr.
    #[error("'p4 {command}' failed: {stderr}")]
    P4Failed { command: String, stderr: String },
}

// --- Parse Errors ---

/// Response parsing errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// The output of `command` did not contain `field`.
    #[error("'p4 {command}' output is missing '{field}'")]
    Incomplete {
        command: &'static str,
        field: &'static str,
    },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse configuration file.
    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: String, message: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}

#[cfg(test)]
mod tests;
