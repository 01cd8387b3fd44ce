// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Client resolution strategies.
//!
//! ```text
//! ConfigFileStrategy   p4config scan upward from the root     (no p4 call)
//! InfoStrategy         `p4 info`: client root contains root
//! ClientsStrategy      `p4 clients -u <user>`: host matches and root contains root
//! ```
//!
//! Each strategy answers `Some(client)` or `None`; the resolver stops at the
//! first `Some`. `p4 info` runs at most once per attempt and is shared
//! through [`ResolveContext`].

use std::path::{Path, PathBuf};

use futures_util::future::BoxFuture;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use super::p4config::find_client;
use super::paths::{is_same_or_relative_to_with, platform_case_handling};
use crate::config::types::ResolveConfig;
use crate::logging::LogReason;
use crate::p4::parse::ServerInfo;
use crate::p4::{ClientName, P4Executor};

/// State shared by the strategies during one resolution attempt.
pub struct ResolveContext {
    root: PathBuf,
    p4: P4Executor,
    info: OnceCell<Option<ServerInfo>>,
}

impl ResolveContext {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, p4: P4Executor) -> Self {
        Self {
            root: root.into(),
            p4,
            info: OnceCell::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub const fn p4(&self) -> &P4Executor {
        &self.p4
    }

    /// `p4 info` for the root, run on first use. A failure is logged and
    /// remembered as `None`.
    pub async fn server_info(&self) -> Option<&ServerInfo> {
        self.info
            .get_or_init(|| async {
                match self.p4.info(&self.root).await {
                    Ok(info) => Some(info),
                    Err(e) => {
                        warn!(
                            reason = LogReason::Resolve.as_str(),
                            root = %self.root.display(),
                            error = %e,
                            "p4 info failed"
                        );
                        None
                    }
                }
            })
            .await
            .as_ref()
    }

    /// Containment under the server's case handling.
    fn contains_root(&self, info: &ServerInfo, candidate_root: &Path) -> bool {
        let case = info.case_handling.unwrap_or_else(platform_case_handling);
        is_same_or_relative_to_with(&self.root, candidate_root, case)
    }
}

/// One way of finding the client that owns a root.
pub trait Strategy: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn resolve<'a>(&'a self, ctx: &'a ResolveContext) -> BoxFuture<'a, Option<ClientName>>;
}

/// The built-in strategies in resolution order.
///
/// `p4config_env` is the value of `$P4CONFIG`, tried before the configured
/// file names.
#[must_use]
pub fn default_strategies(
    settings: &ResolveConfig,
    p4config_env: Option<&str>,
) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(ConfigFileStrategy::new(
            settings.candidate_file_names(p4config_env),
            settings.client_keys.clone(),
        )),
        Box::new(InfoStrategy),
        Box::new(ClientsStrategy::new(
            settings.host_override().map(ToString::to_string),
        )),
    ]
}

/// Reads the client from the nearest p4config file.
#[derive(Debug, Clone)]
pub struct ConfigFileStrategy {
    file_names: Vec<String>,
    client_keys: Vec<String>,
}

impl ConfigFileStrategy {
    #[must_use]
    pub const fn new(file_names: Vec<String>, client_keys: Vec<String>) -> Self {
        Self {
            file_names,
            client_keys,
        }
    }
}

impl Strategy for ConfigFileStrategy {
    fn name(&self) -> &'static str {
        "p4config"
    }

    fn resolve<'a>(&'a self, ctx: &'a ResolveContext) -> BoxFuture<'a, Option<ClientName>> {
        Box::pin(async move {
            find_client(ctx.root(), &self.file_names, &self.client_keys)
                .await
                .map(|found| found.client)
        })
    }
}

/// Uses the client `p4 info` reports when its root contains the workspace.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl Strategy for InfoStrategy {
    fn name(&self) -> &'static str {
        "info"
    }

    fn resolve<'a>(&'a self, ctx: &'a ResolveContext) -> BoxFuture<'a, Option<ClientName>> {
        Box::pin(async move {
            let info = ctx.server_info().await?;
            let client_root = info.client_root.as_deref()?;
            let client = info.client_name.as_deref()?;
            if ctx.contains_root(info, client_root) {
                Some(ClientName::new(client))
            } else {
                debug!(
                    reason = LogReason::Resolve.as_str(),
                    client,
                    client_root = %client_root.display(),
                    "current client does not contain the workspace"
                );
                None
            }
        })
    }
}

/// Scans the user's clients for one on this host whose root contains the
/// workspace.
#[derive(Debug, Clone, Default)]
pub struct ClientsStrategy {
    host: Option<String>,
}

impl ClientsStrategy {
    #[must_use]
    pub const fn new(host: Option<String>) -> Self {
        Self { host }
    }
}

impl Strategy for ClientsStrategy {
    fn name(&self) -> &'static str {
        "clients"
    }

    fn resolve<'a>(&'a self, ctx: &'a ResolveContext) -> BoxFuture<'a, Option<ClientName>> {
        Box::pin(async move {
            let info = ctx.server_info().await?;
            let user = info.require_user_name().ok()?;
            let host = match &self.host {
                Some(host) => host.as_str(),
                None => info.require_client_host().ok()?,
            };

            let rows = match ctx.p4().clients(ctx.root(), user).await {
                Ok(rows) => rows,
                Err(e) => {
                    warn!(
                        reason = LogReason::Resolve.as_str(),
                        root = %ctx.root().display(),
                        error = %e,
                        "p4 clients failed"
                    );
                    return None;
                }
            };

            rows.into_iter()
                .find(|row| same_host(&row.host, host) && ctx.contains_root(info, &row.root))
                .map(|row| row.client)
        })
    }
}

/// Host names compare case-insensitively. A client without a host may be
/// used from any machine.
fn same_host(row_host: &str, host: &str) -> bool {
    row_host.is_empty() || row_host.eq_ignore_ascii_case(host)
}
