// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Lexical path helpers shared by the folder registry and the strategies.
//!
//! Nothing here touches the filesystem: symlinks are not followed and `..`
//! is resolved against the path text alone.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

use crate::p4::parse::CaseHandling;

/// Case handling of the local filesystem, used when the server did not say.
#[must_use]
pub const fn platform_case_handling() -> CaseHandling {
    if cfg!(any(windows, target_os = "macos")) {
        CaseHandling::Insensitive
    } else {
        CaseHandling::Sensitive
    }
}

/// Removes `.` segments, folds `..` into its parent and drops trailing
/// separators.
///
/// A `..` that would climb above the root of an absolute path is discarded;
/// leading `..` segments of a relative path are kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// True when `candidate` equals `base` or lies beneath it.
///
/// Uses the platform's case handling.
#[must_use]
pub fn is_same_or_relative_to(candidate: &Path, base: &Path) -> bool {
    is_same_or_relative_to_with(candidate, base, platform_case_handling())
}

/// [`is_same_or_relative_to`] with explicit case handling, e.g. the one
/// reported by `p4 info`.
#[must_use]
pub fn is_same_or_relative_to_with(candidate: &Path, base: &Path, case: CaseHandling) -> bool {
    let candidate = normalize(candidate);
    let base = normalize(base);
    if candidate.is_absolute() != base.is_absolute() {
        return false;
    }

    let mut candidate_parts = candidate.components();
    for base_part in base.components() {
        match candidate_parts.next() {
            Some(part) if same_component(part.as_os_str(), base_part.as_os_str(), case) => {}
            _ => return false,
        }
    }
    true
}

fn same_component(a: &OsStr, b: &OsStr, case: CaseHandling) -> bool {
    match case {
        CaseHandling::Sensitive => a == b,
        CaseHandling::Insensitive => match (a.to_str(), b.to_str()) {
            (Some(a), Some(b)) => a.to_lowercase() == b.to_lowercase(),
            _ => a == b,
        },
    }
}

/// Number of components, used to prefer the deepest of several roots.
pub(crate) fn depth(path: &Path) -> usize {
    path.components().count()
}
