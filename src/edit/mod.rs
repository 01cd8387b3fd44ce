// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Making files writable before they are saved.
//!
//! ```text
//! prepare_for_edit(file)
//!   missing?           --> Missing         (nothing to open)
//!   writable?          --> AlreadyWritable (no p4 call)
//!   folder_for(file)   --> NoWorkspaceFolder
//!   resolve(root)      --> ResolutionFailed
//!   p4 -c <client> edit <file>
//!       exit 0         --> CheckedOut
//!       otherwise      --> P4Failed (stderr)
//! ```
//!
//! [`ensure_editable`] folds this into the bool a save hook needs.


use std::io::ErrorKind;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{P4Result, ProcessError, WorkspaceError};
use crate::logging::LogReason;
use crate::p4::ClientName;
use crate::workspace::WorkspaceResolver;

/// What [`prepare_for_edit`] did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum EditOutcome {
    /// The file does not exist yet.
    Missing,
    /// The file was already writable.
    AlreadyWritable,
    /// `p4 edit` opened the file.
    CheckedOut { client: ClientName },
}

/// Makes `file` writable, opening it for edit in its client when read-only.
///
/// "Read-only" is the permission bit p4 clears on files that are not open
/// for edit; ownership and the caller's effective access are not consulted.
///
/// # Errors
///
/// Returns a workspace error when the file has no workspace or the workspace
/// has no client, `ProcessError::P4Failed` when `p4 edit` fails, or an I/O
/// error when the file cannot be inspected.
pub async fn prepare_for_edit(resolver: &WorkspaceResolver, file: &Path) -> P4Result<EditOutcome> {
    let metadata = match tokio::fs::metadata(file).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(reason = LogReason::Filesystem.as_str(), file = %file.display(), "file missing");
            return Ok(EditOutcome::Missing);
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.permissions().readonly() {
        return Ok(EditOutcome::AlreadyWritable);
    }

    let root = resolver
        .folders()
        .folder_for(file)
        .ok_or_else(|| WorkspaceError::no_folder(file))?;
    let client = resolver.resolve(&root).await?;

    let path = file.to_string_lossy();
    let result = resolver.execute_in_workspace(file, "edit", &[&path]).await?;
    if result.failed {
        return Err(ProcessError::P4Failed {
            command: "edit".to_string(),
            stderr: result.stderr.trim().to_string(),
        }
        .into());
    }

    info!(file = %file.display(), client = %client, "opened for edit");
    Ok(EditOutcome::CheckedOut { client })
}

/// True when `file` may be written: it is missing, writable, or `p4 edit`
/// succeeded. Failures are logged and reported as `false`.
pub async fn ensure_editable(resolver: &WorkspaceResolver, file: &Path) -> bool {
    match prepare_for_edit(resolver, file).await {
        Ok(_) => true,
        Err(e) => {
            warn!(file = %file.display(), error = %e, "file could not be made editable");
            false
        }
    }
}
