// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Arguments of the server query commands.

use clap::Args;
use std::path::PathBuf;

/// Arguments for the info command.
#[derive(Debug, Clone, Default, Args)]
pub struct InfoArgs {
    /// Directory to run `p4 info` in (default: current directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,
}

/// Arguments for the clients command.
#[derive(Debug, Clone, Default, Args)]
pub struct ClientsArgs {
    /// Directory to run `p4 clients` in (default: current directory).
    #[arg(value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Owner of the listed clients (default: user reported by `p4 info`).
    #[arg(short = 'u', long = "user", value_name = "USER")]
    pub user: Option<String>,
}
