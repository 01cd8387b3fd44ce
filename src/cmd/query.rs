// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Info and clients commands.

use tokio_util::sync::CancellationToken;

use super::{absolute_or_cwd, print_json};
use crate::cli::query::{ClientsArgs, InfoArgs};
use crate::config::Config;
use crate::error::Result;
use crate::p4::P4Executor;
use crate::p4::parse::ServerInfo;

/// Labelled fields of `info` in the order p4 prints them.
fn info_lines(info: &ServerInfo) -> Vec<String> {
    let path = |p: &Option<std::path::PathBuf>| p.as_ref().map(|p| p.display().to_string());
    let fields = [
        ("User name", info.user_name.clone()),
        ("Client name", info.client_name.clone()),
        ("Client host", info.client_host.clone()),
        ("Client root", path(&info.client_root)),
        ("Current directory", path(&info.current_directory)),
        ("Server address", info.server_address.clone()),
        ("Server version", info.server_version.clone()),
        ("Server services", info.server_services.as_ref().map(|s| s.join(" "))),
        (
            "Case Handling",
            info.case_handling
                .map(|c| format!("{c:?}").to_lowercase()),
        ),
    ];
    fields
        .into_iter()
        .filter_map(|(label, value)| value.map(|value| format!("{label}: {value}")))
        .collect()
}

/// Main handler for info command.
///
/// # Errors
///
/// Returns an error if p4 cannot be started or reports failure.
pub async fn run_info_command(args: &InfoArgs, config: &Config, json: bool) -> Result<()> {
    let dir = absolute_or_cwd(args.dir.as_deref())?;
    let p4 = P4Executor::from_config(&config.p4, CancellationToken::new());
    let info = p4.info(&dir).await?;

    if json {
        return print_json(&info);
    }
    for line in info_lines(&info) {
        println!("{line}");
    }
    Ok(())
}

/// Main handler for clients command.
///
/// # Errors
///
/// Returns an error if p4 fails or no user is given and `info` reports none.
pub async fn run_clients_command(args: &ClientsArgs, config: &Config, json: bool) -> Result<()> {
    let dir = absolute_or_cwd(args.dir.as_deref())?;
    let p4 = P4Executor::from_config(&config.p4, CancellationToken::new());

    let user = match &args.user {
        Some(user) => user.clone(),
        None => p4.info(&dir).await?.require_user_name()?.to_string(),
    };
    let rows = p4.clients(&dir, &user).await?;

    if json {
        return print_json(&rows);
    }
    if rows.is_empty() {
        println!("No clients found for {user}");
    }
    for row in &rows {
        println!("{}\t{}\t{}", row.client, row.host, row.root.display());
    }
    Ok(())
}
