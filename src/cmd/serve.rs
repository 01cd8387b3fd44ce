// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Serve command: JSON-lines requests on stdin, responses on stdout.

use std::sync::Arc;

use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

use crate::cli::workspace::ServeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::service::{Server, WorkspaceService};

/// Main handler for serve command.
///
/// Ctrl+C stops reading and kills running p4 commands.
///
/// # Errors
///
/// Returns an error if stdin cannot be read or stdout cannot be written.
pub async fn run_serve_command(args: &ServeArgs, config: &Config) -> Result<()> {
    let cancel_token = CancellationToken::new();
    let ctrl_c_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Received Ctrl+C, cancelling requests...");
            ctrl_c_token.cancel();
        }
    });

    let service = Arc::new(WorkspaceService::from_config(config, cancel_token.clone()));
    tracing::info!(loose_files = config.resolve.loose_files, "serving requests on stdin");

    Server::builder()
        .service(service)
        .cancel_token(cancel_token)
        .maybe_max_concurrent(args.jobs.map(usize::from))
        .build()
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await
}
