// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for p4ws.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. p4ws.toml (cwd, optional)
//! 3. --config FILE (repeatable)
//! 4. P4WS_* env vars
//! 5. --set section.key=value
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! P4WS_P4__PORT=ssl:perforce:1666     → p4.port = "ssl:perforce:1666"
//! P4WS_P4__TIMEOUT_SECS=10            → p4.timeout_secs = 10
//! P4WS_RESOLVE__CLIENT_KEYS=P4CLIENT  → resolve.client_keys = ["P4CLIENT"]
//! ```
//!
//! Sections and keys are separated by a double underscore so that keys may
//! contain single ones; list values are comma-separated.

pub mod loader;
pub mod types;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;
use types::{LogSettings, P4Config, ResolveConfig};

/// Local configuration file picked up from the current directory.
pub const LOCAL_CONFIG_FILE: &str = "p4ws.toml";

/// Prefix of the environment overrides.
pub const ENV_PREFIX: &str = "P4WS";

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// p4 invocation.
    pub p4: P4Config,
    /// Client resolution.
    pub resolve: ResolveConfig,
    /// Logging.
    pub log: LogSettings,
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use p4_workspace::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("p4ws.toml")
    ///     .with_env_prefix("P4WS")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a single TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, contains invalid TOML, or
    /// does not match the `Config` structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::builder().add_toml_file(path).build()
    }

    /// Load configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML or does not match the
    /// `Config` structure.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder().add_toml_str(content).build()
    }

    /// Checks values that deserialize fine but cannot work.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for an empty p4 program or an empty
    /// list of client keys.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.p4.program.as_os_str().is_empty() {
            return Err(invalid("p4", "program", "must not be empty"));
        }
        if self.resolve.client_keys.iter().all(|k| k.trim().is_empty()) {
            return Err(invalid("resolve", "client_keys", "needs at least one key"));
        }
        if self.resolve.config_file_names.iter().any(|n| n.contains(['/', '\\'])) {
            return Err(invalid(
                "resolve",
                "config_file_names",
                "entries are file names, not paths",
            ));
        }
        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// One `key = value` line per option, sorted by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        self.format_p4_options(&mut options);
        self.format_resolve_options(&mut options);
        self.format_log_options(&mut options);

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }

    fn format_p4_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("p4.program".into(), self.p4.program.display().to_string());
        options.insert("p4.port".into(), self.p4.port.clone());
        options.insert("p4.user".into(), self.p4.user.clone());
        options.insert("p4.global_args".into(), self.p4.global_args.join(" "));
        options.insert("p4.timeout_secs".into(), self.p4.timeout_secs.to_string());
    }

    fn format_resolve_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert(
            "resolve.config_file_names".into(),
            self.resolve.config_file_names.join(", "),
        );
        options.insert(
            "resolve.client_keys".into(),
            self.resolve.client_keys.join(", "),
        );
        options.insert("resolve.host".into(), self.resolve.host.clone());
        options.insert(
            "resolve.loose_files".into(),
            self.resolve.loose_files.to_string(),
        );
    }

    fn format_log_options(&self, options: &mut BTreeMap<String, String>) {
        options.insert("log.level".into(), self.log.level.as_u8().to_string());
        options.insert(
            "log.file_level".into(),
            self.log.file_level.as_u8().to_string(),
        );
        options.insert("log.file".into(), self.log.file.display().to_string());
    }
}

fn invalid(section: &str, key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        message: message.to_string(),
    }
}
