// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the workspace commands: resolve, edit, serve.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the resolve command.
#[derive(Debug, Clone, Args)]
pub struct ResolveArgs {
    /// Workspace roots to resolve (default: current directory).
    #[arg(value_name = "DIR")]
    pub dirs: Vec<PathBuf>,
}

/// Arguments for the edit command.
#[derive(Debug, Clone, Args)]
pub struct EditArgs {
    /// Files to make writable.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Workspace root containing the files (default: each file's directory).
    #[arg(short = 'r', long = "root", value_name = "DIR")]
    pub root: Option<PathBuf>,
}

/// Arguments for the serve command.
#[derive(Debug, Clone, Default, Args)]
pub struct ServeArgs {
    /// Maximum number of requests handled at once (default: CPU count).
    #[arg(short = 'j', long = "jobs", value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub jobs: Option<u16>,
}
