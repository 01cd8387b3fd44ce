// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |      resolve / edit / info / clients / serve
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          service          |
//!              |  host API, JSON-lines loop |
//!              '-----+---------------+-----'
//!                    |               |
//!                    v               v
//!                  edit  -------> workspace
//!             p4 edit on save   folders, p4config,
//!                               strategies, bindings
//!                                    |
//!                                    v
//!                          p4   executor, parse
//!
//!   +-----------------------------------------+
//!   |  core      process (tokio::process)     |
//!   +-----------------------------------------+
//!   |  foundation   config, error, logging    |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod edit;
pub mod error;
pub mod logging;
pub mod p4;
pub mod service;
pub mod workspace;
