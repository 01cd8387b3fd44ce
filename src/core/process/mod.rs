// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Async process spawning and management.
//!
//! ```text
//! ProcessBuilder::new("p4")
//!   .args() .cwd() .timeout() .capture_output()
//!   .run_with_cancellation(token)
//!       --> tokio::process::Command
//!           drain stdout/stderr concurrently
//!           kill on timeout / cancel
//!       --> ProcessOutput { exit_code, stdout, stderr, timed_out, interrupted }
//! ```

pub mod builder;
mod io;
mod runner;
