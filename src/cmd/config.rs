// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Config-related commands for p4ws.

use crate::config::Config;
use crate::error::Result;

use super::print_json;

/// Display current configuration options.
///
/// # Errors
///
/// Returns an error if the configuration cannot be encoded as JSON.
pub fn run_options_command(config: &Config, json: bool) -> Result<()> {
    if json {
        return print_json(config);
    }
    for line in config.format_options() {
        println!("{line}");
    }
    Ok(())
}

/// Display loaded configuration files.
pub fn run_inis_command(config_files: &[String]) {
    if config_files.is_empty() {
        println!("No configuration files loaded");
    } else {
        for line in config_files {
            println!("{line}");
        }
    }
}
