// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Workspace roots and their Perforce client bindings.
//!
//! ```text
//! WorkspaceResolver
//!   folders   WorkspaceFolders         roots announced by the host
//!   bindings  root -> OnceCell<Option<ClientName>>
//!   strategies [p4config, info, clients]
//!
//! per root:
//!   Unresolved --resolve--> Resolving --+--> Bound(client)   (kept for the process lifetime)
//!                                       +--> Failed          (cleared when the root is re-announced)
//! ```
//!
//! Concurrent `resolve` calls for one root share a single attempt: the first
//! caller runs the strategies, the others await its result. A binding is
//! never refreshed; a client whose spec changes on the server keeps its old
//! binding until restart.

pub mod folders;
pub mod p4config;
pub mod paths;
pub mod strategy;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::config::types::{P4CONFIG_ENV, ResolveConfig};
use crate::error::{P4Result, WorkspaceError};
use crate::logging::LogReason;
use crate::p4::{ClientName, CommandResult, P4Executor};

pub use folders::WorkspaceFolders;
pub use paths::{is_same_or_relative_to, normalize};
pub use strategy::{ResolveContext, Strategy, default_strategies};

type Slot = Arc<OnceCell<Option<ClientName>>>;

/// Where a root stands in its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "client", rename_all = "lowercase")]
pub enum BindingState {
    Unresolved,
    Resolving,
    Bound(ClientName),
    Failed,
}

/// Owns the root to client map and resolves roots on demand.
pub struct WorkspaceResolver {
    p4: P4Executor,
    strategies: Vec<Box<dyn Strategy>>,
    folders: WorkspaceFolders,
    bindings: Mutex<HashMap<PathBuf, Slot>>,
}

impl std::fmt::Debug for WorkspaceResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let strategies: Vec<&str> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("WorkspaceResolver")
            .field("p4", &self.p4)
            .field("strategies", &strategies)
            .field("folders", &self.folders)
            .finish_non_exhaustive()
    }
}

impl WorkspaceResolver {
    #[must_use]
    pub fn new(p4: P4Executor, strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self {
            p4,
            strategies,
            folders: WorkspaceFolders::new(),
            bindings: Mutex::new(HashMap::new()),
        }
    }

    /// Resolver with the built-in strategies; reads `$P4CONFIG` once.
    #[must_use]
    pub fn from_config(p4: P4Executor, settings: &ResolveConfig) -> Self {
        let p4config = std::env::var(P4CONFIG_ENV).ok();
        Self::new(p4, default_strategies(settings, p4config.as_deref()))
    }

    #[must_use]
    pub const fn folders(&self) -> &WorkspaceFolders {
        &self.folders
    }

    #[must_use]
    pub const fn p4(&self) -> &P4Executor {
        &self.p4
    }

    fn lock_bindings(&self) -> MutexGuard<'_, HashMap<PathBuf, Slot>> {
        self.bindings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn slot(&self, root: &Path) -> Slot {
        self.lock_bindings()
            .entry(root.to_path_buf())
            .or_default()
            .clone()
    }

    /// Client bound to `root`, resolving it first if needed.
    ///
    /// A root that already failed stays failed until [`forget_failure`]
    /// is called for it.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::ResolutionFailed` if no strategy found a client.
    ///
    /// [`forget_failure`]: Self::forget_failure
    pub async fn resolve(&self, root: &Path) -> P4Result<ClientName> {
        let root = normalize(root);
        let slot = self.slot(&root);
        let resolved = slot.get_or_init(|| self.run_strategies(&root)).await;
        resolved
            .clone()
            .ok_or_else(|| WorkspaceError::unresolved(&root).into())
    }

    async fn run_strategies(&self, root: &Path) -> Option<ClientName> {
        let ctx = ResolveContext::new(root, self.p4.clone());
        for strategy in &self.strategies {
            if let Some(client) = strategy.resolve(&ctx).await {
                info!(
                    reason = LogReason::Resolve.as_str(),
                    root = %root.display(),
                    client = %client,
                    strategy = strategy.name(),
                    "workspace bound"
                );
                return Some(client);
            }
            debug!(
                reason = LogReason::Resolve.as_str(),
                root = %root.display(),
                strategy = strategy.name(),
                "strategy found no client"
            );
        }
        warn!(
            reason = LogReason::Resolve.as_str(),
            root = %root.display(),
            "no client found for workspace"
        );
        None
    }

    /// Client bound to `root`, without resolving.
    #[must_use]
    pub fn binding(&self, root: &Path) -> Option<ClientName> {
        let root = normalize(root);
        self.lock_bindings()
            .get(&root)
            .and_then(|slot| slot.get().cloned().flatten())
    }

    #[must_use]
    pub fn state(&self, root: &Path) -> BindingState {
        let root = normalize(root);
        self.lock_bindings()
            .get(&root)
            .map_or(BindingState::Unresolved, |slot| slot_state(slot))
    }

    /// Every root seen so far with its state, sorted by root.
    #[must_use]
    pub fn states(&self) -> Vec<(PathBuf, BindingState)> {
        let mut states: Vec<(PathBuf, BindingState)> = self
            .lock_bindings()
            .iter()
            .map(|(root, slot)| (root.clone(), slot_state(slot)))
            .collect();
        states.sort_by(|a, b| a.0.cmp(&b.0));
        states
    }

    /// Drops a failed resolution so the next `resolve` tries again.
    ///
    /// Bound and in-flight roots are left alone. Returns whether a failure
    /// was cleared.
    pub fn forget_failure(&self, root: &Path) -> bool {
        let root = normalize(root);
        let mut bindings = self.lock_bindings();
        let failed = bindings
            .get(&root)
            .is_some_and(|slot| matches!(slot.get(), Some(None)));
        if failed {
            bindings.remove(&root);
        }
        failed
    }

    /// Runs a client-scoped command in the workspace containing `path`.
    ///
    /// Fails fast, without starting p4, when the workspace has no binding yet.
    ///
    /// # Errors
    ///
    /// Returns `WorkspaceError::NoWorkspaceFolder` if no registered root
    /// contains `path`, `WorkspaceError::NoClientBinding` if that root is not
    /// bound, or a process error if p4 could not be started.
    pub async fn execute_in_workspace(
        &self,
        path: &Path,
        command: &str,
        args: &[&str],
    ) -> P4Result<CommandResult> {
        let root = self
            .folders
            .folder_for(path)
            .ok_or_else(|| WorkspaceError::no_folder(path))?;
        let client = self
            .binding(&root)
            .ok_or_else(|| WorkspaceError::no_binding(&root))?;
        self.p4
            .execute(&root, command, args, &[], Some(&client))
            .await
    }
}

fn slot_state(slot: &Slot) -> BindingState {
    match slot.get() {
        None => BindingState::Resolving,
        Some(Some(client)) => BindingState::Bound(client.clone()),
        Some(None) => BindingState::Failed,
    }
}
