// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! p4config files: `KEY=VALUE` lines found by walking up from a root.
//!
//! ```text
//! for name in [$P4CONFIG, .p4config, P4CONFIG]:
//!     for dir in root, root/.., ..., /:
//!         dir/name is a file with a client key?  --> found
//! ```
//!
//! Unreadable files are skipped, never fatal.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::logging::LogReason;
use crate::p4::ClientName;

/// Parses p4config text. Later assignments of a key replace earlier ones.
///
/// Blank lines, `#` comments and lines without `=` are ignored; keys and
/// values are trimmed.
#[must_use]
pub fn parse_config(text: &str) -> HashMap<String, String> {
    let mut settings = HashMap::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        settings.insert(key.to_string(), value.trim().to_string());
    }
    settings
}

/// First of `keys` with a non-empty value in `settings`.
#[must_use]
pub fn client_from_settings(
    settings: &HashMap<String, String>,
    keys: &[String],
) -> Option<ClientName> {
    keys.iter()
        .filter_map(|key| settings.get(key))
        .find(|value| !value.is_empty())
        .map(|value| ClientName::new(value.as_str()))
}

/// A client named by a p4config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigMatch {
    pub file: PathBuf,
    pub client: ClientName,
}

/// Looks for a p4config file naming a client, starting at `root`.
///
/// File names are tried in order; for each name every ancestor of `root`
/// is checked, nearest first. A file without a client key does not stop
/// the walk.
pub async fn find_client(root: &Path, names: &[String], keys: &[String]) -> Option<ConfigMatch> {
    for name in names {
        for dir in root.ancestors() {
            let file = dir.join(name);
            let Some(text) = read_config_file(&file).await else {
                continue;
            };
            if let Some(client) = client_from_settings(&parse_config(&text), keys) {
                debug!(
                    reason = LogReason::Resolve.as_str(),
                    file = %file.display(),
                    client = %client,
                    "client named by p4config"
                );
                return Some(ConfigMatch { file, client });
            }
            debug!(
                reason = LogReason::Resolve.as_str(),
                file = %file.display(),
                "p4config names no client"
            );
        }
    }
    None
}

/// Contents of `file` if it is a regular, readable UTF-8 file.
async fn read_config_file(file: &Path) -> Option<String> {
    let metadata = tokio::fs::metadata(file).await.ok()?;
    if !metadata.is_file() {
        return None;
    }
    match tokio::fs::read_to_string(file).await {
        Ok(text) => Some(text),
        Err(e) => {
            warn!(
                reason = LogReason::Filesystem.as_str(),
                file = %file.display(),
                error = %e,
                "skipping unreadable p4config"
            );
            None
        }
    }
}
