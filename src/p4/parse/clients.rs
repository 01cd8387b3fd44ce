// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! `p4 -ztag -F "%client%;%Root%;%Host%" clients -u <user>` output.

use std::path::PathBuf;

use serde::Serialize;
use tracing::warn;

use crate::logging::LogReason;
use crate::p4::ClientName;

/// Output format passed to `-F`; fields are separated by [`FIELD_SEPARATOR`].
pub const CLIENTS_FORMAT: &str = "%client%;%Root%;%Host%";

pub const FIELD_SEPARATOR: char = ';';

/// One client spec owned by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientRow {
    pub client: ClientName,
    pub root: PathBuf,
    /// Empty when the spec is not locked to a host.
    pub host: String,
}

/// Parses scripted `clients` output, one row per non-empty line.
///
/// Lines with fewer than three fields are logged and skipped. A root that
/// itself contains the separator keeps everything between the first and
/// last field. Row order follows the output.
#[must_use]
pub fn parse_clients(stdout: &str) -> Vec<ClientRow> {
    stdout
        .trim_end_matches(['\n', '\r'])
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Option<ClientRow> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() < 3 {
        warn!(
            reason = LogReason::Parse.as_str(),
            line = %line,
            fields = fields.len(),
            "skipping malformed clients row"
        );
        return None;
    }

    let client = fields[0].trim();
    let host = fields[fields.len() - 1].trim();
    let root = fields[1..fields.len() - 1].join(";");

    Some(ClientRow {
        client: ClientName::new(client),
        root: PathBuf::from(root.trim()),
        host: host.to_string(),
    })
}
