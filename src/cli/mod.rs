// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for p4ws using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! p4ws [global options] <command>
//! resolve [DIR...]
//! edit FILE... [--root DIR]
//! info [DIR]
//! clients [DIR] [--user USER]
//! serve [--jobs N]
//! options
//! inis
//! ```

pub mod global;
pub mod query;
pub mod workspace;


use crate::cli::global::GlobalOptions;
use crate::cli::query::{ClientsArgs, InfoArgs};
use crate::cli::workspace::{EditArgs, ResolveArgs, ServeArgs};
use clap::{Parser, Subcommand};

/// Perforce workspace resolution
///
/// Finds the Perforce client behind a directory and opens files for edit.
#[derive(Debug, Parser)]
#[command(
    name = "p4ws",
    author,
    version,
    about = "Perforce workspace resolution",
    long_about = "p4ws Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Finds the Perforce client bound to a workspace directory and\n\
                  opens read-only files for edit before they are saved.\n\n\
                  `p4ws resolve` prints the client of the current directory.\n\
                  `p4ws serve` answers JSON requests from an editor on stdin.\n\
                  See `p4ws <command> --help` for more information about a command.",
    after_help = "CONFIG FILES:\n\n\
                  By default, p4ws reads `p4ws.toml` from the current directory\n\
                  if it exists. Additional files can be given with --config and\n\
                  are loaded after it, later files overriding earlier ones.\n\
                  P4WS_* environment variables (P4WS_P4__PORT, ...) and --set\n\
                  are applied last. Use --no-default-config to only use --config."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,

    /// Lists all options and their values.
    Options,

    /// Lists the config files used by p4ws.
    Inis,

    /// Prints the client bound to each directory.
    Resolve(ResolveArgs),

    /// Opens read-only files for edit in their client.
    Edit(EditArgs),

    /// Runs `p4 info` and prints the parsed fields.
    Info(InfoArgs),

    /// Lists the clients owned by a user.
    Clients(ClientsArgs),

    /// Answers JSON-lines requests on stdin until EOF or shutdown.
    Serve(ServeArgs),
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

/// Parses command-line arguments from an iterator.
pub fn parse_from<I, T>(iter: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::parse_from(iter)
}

/// Tries to parse command-line arguments, returning an error on failure.
///
/// # Errors
///
/// Returns a `clap::Error` if the arguments are invalid or if help/version information
/// was requested.
pub fn try_parse() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}
