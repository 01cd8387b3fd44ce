// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Host-facing API.
//!
//! ```text
//! host (editor, p4ws serve, CLI)
//!   notify_workspace_roots_changed(added, removed)  --> register + resolve each added root
//!   notify_document_opened(path)                     --> resolve a loose file's directory
//!   ensure_editable(path) -> bool                    --> save hook veto
//!   binding(root)                                    --> current client, no resolution
//! ```

pub mod protocol;
pub mod server;


use std::path::{Path, PathBuf};

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::Config;
use crate::edit::{self, EditOutcome};
use crate::error::P4Result;
use crate::logging::LogReason;
use crate::p4::{ClientName, P4Executor};
use crate::workspace::{BindingState, WorkspaceResolver};

pub use server::Server;

/// Result of resolving one root.
#[derive(Debug)]
pub struct RootResolution {
    pub root: PathBuf,
    pub result: P4Result<ClientName>,
}

/// Workspace resolution and edit preparation for one host process.
#[derive(Debug)]
pub struct WorkspaceService {
    resolver: WorkspaceResolver,
    loose_files: bool,
}

impl WorkspaceService {
    #[must_use]
    pub const fn new(resolver: WorkspaceResolver, loose_files: bool) -> Self {
        Self {
            resolver,
            loose_files,
        }
    }

    /// Service spawning the configured p4; `cancel_token` stops running commands.
    #[must_use]
    pub fn from_config(config: &Config, cancel_token: CancellationToken) -> Self {
        let p4 = P4Executor::from_config(&config.p4, cancel_token);
        let resolver = WorkspaceResolver::from_config(p4, &config.resolve);
        Self::new(resolver, config.resolve.loose_files)
    }

    #[must_use]
    pub const fn resolver(&self) -> &WorkspaceResolver {
        &self.resolver
    }

    /// Registers `added` roots and resolves them concurrently; unregisters
    /// `removed` ones.
    ///
    /// Bindings of removed roots are kept. Re-adding a root whose resolution
    /// failed retries it. Results follow the order of `added`.
    pub async fn notify_workspace_roots_changed(
        &self,
        added: &[PathBuf],
        removed: &[PathBuf],
    ) -> Vec<RootResolution> {
        for root in removed {
            if self.resolver.folders().remove(root) {
                debug!(reason = LogReason::Resolve.as_str(), root = %root.display(), "workspace removed");
            }
        }

        let roots: Vec<PathBuf> = added
            .iter()
            .map(|root| {
                let (root, _) = self.resolver.folders().add(root);
                self.resolver.forget_failure(&root);
                root
            })
            .collect();

        join_all(roots.into_iter().map(|root| async move {
            let result = self.resolver.resolve(&root).await;
            RootResolution { root, result }
        }))
        .await
    }

    /// Resolves the directory of a document outside every workspace root.
    ///
    /// Returns `None` when loose files are disabled or the document already
    /// belongs to a registered root.
    pub async fn notify_document_opened(&self, path: &Path) -> Option<RootResolution> {
        if !self.loose_files || self.resolver.folders().folder_for(path).is_some() {
            return None;
        }

        let is_dir = tokio::fs::metadata(path).await.is_ok_and(|m| m.is_dir());
        let dir = if is_dir { path } else { path.parent()? };
        let (root, _) = self.resolver.folders().add(dir);
        self.resolver.forget_failure(&root);
        debug!(reason = LogReason::Resolve.as_str(), root = %root.display(), "loose file root");

        let result = self.resolver.resolve(&root).await;
        Some(RootResolution { root, result })
    }

    /// Save hook: true when `path` may be written.
    pub async fn ensure_editable(&self, path: &Path) -> bool {
        edit::ensure_editable(&self.resolver, path).await
    }

    /// Like [`ensure_editable`](Self::ensure_editable), with the reason.
    ///
    /// # Errors
    ///
    /// See [`edit::prepare_for_edit`].
    pub async fn prepare_for_edit(&self, path: &Path) -> P4Result<EditOutcome> {
        edit::prepare_for_edit(&self.resolver, path).await
    }

    #[must_use]
    pub fn binding(&self, root: &Path) -> Option<ClientName> {
        self.resolver.binding(root)
    }

    #[must_use]
    pub fn state(&self, root: &Path) -> BindingState {
        self.resolver.state(root)
    }
}
