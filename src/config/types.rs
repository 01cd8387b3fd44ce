// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration sections.
//!
//! ```text
//! Config: P4Config [p4], ResolveConfig [resolve], LogSettings [log]
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::logging::LogLevel;

#[cfg(windows)]
const DEFAULT_PROGRAM: &str = "p4.exe";
#[cfg(not(windows))]
const DEFAULT_PROGRAM: &str = "p4";

/// Environment variable naming the p4config file.
pub const P4CONFIG_ENV: &str = "P4CONFIG";

/// How p4 is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct P4Config {
    /// p4 executable; a bare name is looked up on PATH.
    pub program: PathBuf,
    /// Server address, passed as global `-p`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub port: String,
    /// User, passed as global `-u`.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub user: String,
    /// Extra global flags, placed after `-p`/`-u` and before `-c`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub global_args: Vec<String>,
    /// Per-invocation timeout in seconds; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for P4Config {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            port: String::new(),
            user: String::new(),
            global_args: Vec::new(),
            timeout_secs: 30,
        }
    }
}

impl P4Config {
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        if self.timeout_secs == 0 {
            None
        } else {
            Some(Duration::from_secs(self.timeout_secs))
        }
    }

    /// Global arguments prepended to every command.
    #[must_use]
    pub fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if !self.port.is_empty() {
            args.push("-p".to_string());
            args.push(self.port.clone());
        }
        if !self.user.is_empty() {
            args.push("-u".to_string());
            args.push(self.user.clone());
        }
        args.extend(self.global_args.iter().cloned());
        args
    }
}

/// Client resolution settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolveConfig {
    /// p4config file names tried after the one named by `$P4CONFIG`.
    pub config_file_names: Vec<String>,
    /// Keys naming the client inside a p4config file, in priority order.
    pub client_keys: Vec<String>,
    /// Host matched against `clients` rows instead of the one `info` reports.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub host: String,
    /// Resolve opened documents that sit outside every workspace root.
    pub loose_files: bool,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            config_file_names: vec![".p4config".to_string(), "P4CONFIG".to_string()],
            client_keys: vec!["P4CLIENT".to_string(), "CLIENT".to_string()],
            host: String::new(),
            loose_files: false,
        }
    }
}

impl ResolveConfig {
    /// Candidate p4config names: `$P4CONFIG` first, then the configured
    /// fallbacks, without duplicates.
    #[must_use]
    pub fn candidate_file_names(&self, from_env: Option<&str>) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.config_file_names.len() + 1);
        let env = from_env.map(str::trim).filter(|n| !n.is_empty());
        for name in env.into_iter().chain(self.config_file_names.iter().map(String::as_str)) {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Host override, if set.
    #[must_use]
    pub fn host_override(&self) -> Option<&str> {
        Some(self.host.as_str()).filter(|h| !h.is_empty())
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogSettings {
    /// Console level (0-6).
    pub level: LogLevel,
    /// Diagnostic sink level (0-6).
    pub file_level: LogLevel,
    /// Diagnostic sink path; empty keeps logging on the console only.
    pub file: PathBuf,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::INFO,
            file_level: LogLevel::TRACE,
            file: PathBuf::new(),
        }
    }
}

impl LogSettings {
    #[must_use]
    pub fn file(&self) -> Option<&std::path::Path> {
        Some(self.file.as_path()).filter(|p| !p.as_os_str().is_empty())
    }
}
