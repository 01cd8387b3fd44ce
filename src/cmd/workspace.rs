// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Resolve and edit commands.
//!
//! ```text
//! resolve DIR...  --> notify_workspace_roots_changed(DIR..., []) --> client per root
//! edit FILE...    --> register --root (or each file's directory)
//!                 --> prepare_for_edit per file
//! ```

use std::path::PathBuf;

use anyhow::anyhow;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::{absolute_or_cwd, print_json};
use crate::cli::workspace::{EditArgs, ResolveArgs};
use crate::config::Config;
use crate::edit::EditOutcome;
use crate::error::Result;
use crate::service::WorkspaceService;
use crate::service::protocol::{EditReport, RootReport, RootsReport};

/// Main handler for resolve command.
///
/// # Errors
///
/// Returns an error if a directory is invalid or any root could not be resolved.
pub async fn run_resolve_command(args: &ResolveArgs, config: &Config, json: bool) -> Result<()> {
    let roots = if args.dirs.is_empty() {
        vec![absolute_or_cwd(None)?]
    } else {
        args.dirs
            .iter()
            .map(|dir| absolute_or_cwd(Some(dir)))
            .collect::<Result<Vec<_>>>()?
    };

    let service = WorkspaceService::from_config(config, CancellationToken::new());
    let reports: Vec<RootReport> = service
        .notify_workspace_roots_changed(&roots, &[])
        .await
        .into_iter()
        .map(RootReport::from)
        .collect();
    let failed = reports.iter().filter(|r| r.client.is_none()).count();

    if json {
        print_json(&RootsReport {
            roots: reports.clone(),
        })?;
    } else {
        for report in &reports {
            match (&report.client, &report.error) {
                (Some(client), _) => println!("{client}\t{}", report.root.display()),
                (None, error) => eprintln!(
                    "{}: {}",
                    report.root.display(),
                    error.as_deref().unwrap_or("unresolved")
                ),
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} workspace(s) could not be resolved",
            reports.len()
        ));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct FileReport {
    file: PathBuf,
    #[serde(flatten)]
    report: EditReport,
}

/// Main handler for edit command.
///
/// # Errors
///
/// Returns an error if a path is invalid or any file could not be made editable.
pub async fn run_edit_command(args: &EditArgs, config: &Config, json: bool) -> Result<()> {
    let files = args
        .files
        .iter()
        .map(|file| absolute_or_cwd(Some(file)))
        .collect::<Result<Vec<_>>>()?;

    let mut roots: Vec<PathBuf> = match &args.root {
        Some(root) => vec![absolute_or_cwd(Some(root))?],
        None => files
            .iter()
            .filter_map(|file| file.parent().map(PathBuf::from))
            .collect(),
    };
    roots.sort();
    roots.dedup();

    let service = WorkspaceService::from_config(config, CancellationToken::new());
    service.notify_workspace_roots_changed(&roots, &[]).await;

    let mut reports = Vec::with_capacity(files.len());
    for file in files {
        let report = EditReport::from(service.prepare_for_edit(&file).await);
        reports.push(FileReport { file, report });
    }
    let failed = reports.iter().filter(|r| !r.report.editable).count();

    if json {
        print_json(&reports)?;
    } else {
        for FileReport { file, report } in &reports {
            let file = file.display();
            match (&report.outcome, &report.reason) {
                (Some(EditOutcome::Missing), _) => println!("{file}: missing, nothing to open"),
                (Some(EditOutcome::AlreadyWritable), _) => println!("{file}: already writable"),
                (Some(EditOutcome::CheckedOut { client }), _) => {
                    println!("{file}: opened for edit in {client}");
                }
                (None, reason) => {
                    eprintln!("{file}: {}", reason.as_deref().unwrap_or("not editable"));
                }
            }
        }
    }

    if failed > 0 {
        return Err(anyhow!(
            "{failed} of {} file(s) could not be made editable",
            reports.len()
        ));
    }
    Ok(())
}
