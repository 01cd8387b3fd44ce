// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core process plumbing.
//!
//! ```text
//!        core
//!         |
//!         v
//!      process
//!         |
//!   Builder  Output
//!   timeout  cancellation
//! ```

pub mod process;
