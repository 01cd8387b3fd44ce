// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Registry of the workspace roots announced by the host.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::paths::{depth, is_same_or_relative_to, normalize};

/// Set of workspace roots, stored normalized.
#[derive(Debug, Default)]
pub struct WorkspaceFolders {
    roots: RwLock<BTreeSet<PathBuf>>,
}

impl WorkspaceFolders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `root`; returns the normalized root and whether it was new.
    pub fn add(&self, root: &Path) -> (PathBuf, bool) {
        let root = normalize(root);
        let inserted = self.write_roots().insert(root.clone());
        (root, inserted)
    }

    /// Unregisters `root`; returns whether it was present.
    pub fn remove(&self, root: &Path) -> bool {
        self.write_roots().remove(&normalize(root))
    }

    #[must_use]
    pub fn contains(&self, root: &Path) -> bool {
        self.read_roots().contains(&normalize(root))
    }

    /// Registered roots in sorted order.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        self.read_roots().iter().cloned().collect()
    }

    /// The deepest registered root containing `path`.
    #[must_use]
    pub fn folder_for(&self, path: &Path) -> Option<PathBuf> {
        self.read_roots()
            .iter()
            .filter(|root| is_same_or_relative_to(path, root))
            .max_by_key(|root| depth(root))
            .cloned()
    }

    // The set is valid after any panic, so a poisoned lock is recovered.
    fn read_roots(&self) -> RwLockReadGuard<'_, BTreeSet<PathBuf>> {
        self.roots.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_roots(&self) -> RwLockWriteGuard<'_, BTreeSet<PathBuf>> {
        self.roots.write().unwrap_or_else(PoisonError::into_inner)
    }
}
