// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers
//!   config (options, inis), query (info, clients),
//!   workspace (resolve, edit), serve
//! ```

pub mod config;
pub mod query;
pub mod serve;
pub mod workspace;

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::error::Result;

/// Prints `value` as pretty JSON on stdout.
fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// `path` made absolute against the current directory, or the current
/// directory itself.
fn absolute_or_cwd(path: Option<&Path>) -> Result<PathBuf> {
    let path = path.unwrap_or_else(|| Path::new("."));
    std::path::absolute(path).with_context(|| format!("invalid path '{}'", path.display()))
}
