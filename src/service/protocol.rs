// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Line-delimited JSON messages spoken by `p4ws serve`.
//!
//! One request per input line, one response per output line:
//!
//! ```text
//! {"id":1,"method":"roots_changed","added":["/ws/proj"],"removed":[]}
//! {"id":1,"ok":true,"result":{"roots":[{"root":"/ws/proj","client":"bob-ws"}]}}
//!
//! {"id":2,"method":"ensure_editable","path":"/ws/proj/a.txt"}
//! {"id":2,"ok":true,"result":{"editable":true,"outcome":"checked_out","client":"bob-ws"}}
//! ```
//!
//! Responses to concurrent requests may arrive out of order; `id` is echoed
//! back unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::RootResolution;
use crate::edit::EditOutcome;
use crate::error::P4Result;
use crate::p4::ClientName;
use crate::workspace::BindingState;

/// A request line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(flatten)]
    pub request: Request,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Request {
    RootsChanged {
        #[serde(default)]
        added: Vec<PathBuf>,
        #[serde(default)]
        removed: Vec<PathBuf>,
    },
    DocumentOpened {
        path: PathBuf,
    },
    EnsureEditable {
        path: PathBuf,
    },
    Binding {
        root: PathBuf,
    },
    /// Every root seen so far with its state.
    Bindings,
    /// Finish in-flight requests, acknowledge and stop reading.
    Shutdown,
}

impl Request {
    #[must_use]
    pub const fn method(&self) -> &'static str {
        match self {
            Self::RootsChanged { .. } => "roots_changed",
            Self::DocumentOpened { .. } => "document_opened",
            Self::EnsureEditable { .. } => "ensure_editable",
            Self::Binding { .. } => "binding",
            Self::Bindings => "bindings",
            Self::Shutdown => "shutdown",
        }
    }
}

/// A response line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// Successful response carrying `result`.
    ///
    /// A result that cannot be serialized turns into an error response.
    pub fn success(id: Option<Value>, result: &impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                id,
                ok: true,
                result: Some(result),
                error: None,
            },
            Err(e) => Self::error(id, format!("failed to encode result: {e}")),
        }
    }

    pub fn error(id: Option<Value>, message: impl Into<String>) -> Self {
        Self {
            id,
            ok: false,
            result: None,
            error: Some(message.into()),
        }
    }
}

/// One root in a `roots_changed` or `document_opened` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootReport {
    pub root: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<RootResolution> for RootReport {
    fn from(resolution: RootResolution) -> Self {
        let (client, error) = match resolution.result {
            Ok(client) => (Some(client), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            root: resolution.root,
            client,
            error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootsReport {
    pub roots: Vec<RootReport>,
}

/// `document_opened` result; `root` is absent when nothing was resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub root: Option<RootReport>,
}

/// `ensure_editable` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub editable: bool,
    #[serde(flatten)]
    pub outcome: Option<EditOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl From<P4Result<EditOutcome>> for EditReport {
    fn from(result: P4Result<EditOutcome>) -> Self {
        match result {
            Ok(outcome) => Self {
                editable: true,
                outcome: Some(outcome),
                reason: None,
            },
            Err(e) => Self {
                editable: false,
                outcome: None,
                reason: Some(e.to_string()),
            },
        }
    }
}

/// `binding` result, and one entry of a `bindings` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingReport {
    pub root: PathBuf,
    pub binding: BindingState,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BindingsReport {
    pub bindings: Vec<BindingReport>,
}
