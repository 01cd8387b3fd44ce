// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `p4 info` output.
//!
//! ```text
//! User name: bob
//! Client name: bob-ws
//! Client root: /home/bob/ws
//! Server services: standard commit-server
//! Case Handling: insensitive
//! ...
//! ```

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{P4Result, ParseError};

/// How the server compares file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseHandling {
    Sensitive,
    Insensitive,
}

impl CaseHandling {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "sensitive" => Some(Self::Sensitive),
            "insensitive" => Some(Self::Insensitive),
            _ => None,
        }
    }
}

/// Parsed `p4 info` record. Every field is optional; absent labels stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_directory: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub peer_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_root: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_services: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_license: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_license_ip: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_handling: Option<CaseHandling>,
}

impl ServerInfo {
    /// True when no recognized label was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// The user name, or `ParseError::Incomplete`.
    ///
    /// # Errors
    ///
    /// Returns an error if `User name` was not reported.
    pub fn require_user_name(&self) -> P4Result<&str> {
        self.user_name
            .as_deref()
            .ok_or_else(|| incomplete("User name"))
    }

    /// The client host, or `ParseError::Incomplete`.
    ///
    /// # Errors
    ///
    /// Returns an error if `Client host` was not reported.
    pub fn require_client_host(&self) -> P4Result<&str> {
        self.client_host
            .as_deref()
            .ok_or_else(|| incomplete("Client host"))
    }

    fn assign(&mut self, key: &str, value: &str) {
        let text = || Some(value.to_string());
        let path = || Some(PathBuf::from(value));
        match key {
            "User name" => self.user_name = text(),
            "Client name" => self.client_name = text(),
            "Client host" => self.client_host = text(),
            "Client root" => self.client_root = path(),
            "Current directory" => self.current_directory = path(),
            "Peer address" => self.peer_address = text(),
            "Client address" => self.client_address = text(),
            "Server address" => self.server_address = text(),
            "Server root" => self.server_root = path(),
            "Server date" => self.server_date = text(),
            "Server uptime" => self.server_uptime = text(),
            "Server version" => self.server_version = text(),
            "Server ID" => self.server_id = text(),
            "Server services" => {
                self.server_services = Some(value.split_whitespace().map(String::from).collect());
            }
            "Server license" => self.server_license = text(),
            "Server license-ip" => self.server_license_ip = text(),
            "Case Handling" => self.case_handling = CaseHandling::parse(value),
            _ => {}
        }
    }
}

fn incomplete(field: &'static str) -> crate::error::P4Error {
    ParseError::Incomplete {
        command: "info",
        field,
    }
    .into()
}

/// Parses `p4 info` output.
///
/// Each line is split on the first `": "`; unknown labels and lines without a
/// separator (such as `Client unknown.`) are ignored. Never fails.
#[must_use]
pub fn parse_info(stdout: &str) -> ServerInfo {
    let mut info = ServerInfo::default();
    for line in stdout.lines() {
        if let Some((key, value)) = line.split_once(": ") {
            info.assign(key.trim(), value.trim());
        }
    }
    info
}
