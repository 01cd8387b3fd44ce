// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Parsers for p4 introspection output.
//!
//! ```text
//! parse_info     "Key: value" lines       --> ServerInfo (all fields optional)
//! parse_clients  "client;root;host" lines --> Vec<ClientRow> (bad rows skipped)
//! ```

mod clients;
mod info;

pub use clients::{CLIENTS_FORMAT, ClientRow, FIELD_SEPARATOR, parse_clients};
pub use info::{CaseHandling, ServerInfo, parse_info};
