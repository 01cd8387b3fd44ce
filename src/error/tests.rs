// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::Path;

use super::{P4Error, P4Result, ParseError, ProcessError, WorkspaceError};

#[test]
fn test_workspace_error_display() {
    let err = WorkspaceError::unresolved(Path::new("/ws/proj"));
    insta::assert_snapshot!(err.to_string(), @"no client found for workspace '/ws/proj'");

    let err = WorkspaceError::no_binding(Path::new("/ws/proj"));
    insta::assert_snapshot!(err.to_string(), @"no perforce client bound to workspace '/ws/proj'");
}

#[test]
fn test_wrapped_error_display() {
    let err: P4Error = ParseError::Incomplete {
        command: "info",
        field: "User name",
    }
    .into();
    insta::assert_snapshot!(err.to_string(), @"parse error: 'p4 info' output is missing 'User name'");

    let err: P4Error = ProcessError::P4Failed {
        command: "edit".to_string(),
        stderr: "/ws/a.txt - file(s) not on client.".to_string(),
    }
    .into();
    insta::assert_snapshot!(
        err.to_string(),
        @"process error: 'p4 edit' failed: /ws/a.txt - file(s) not on client."
    );

    let err: P4Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed").into();
    insta::assert_snapshot!(err.to_string(), @"io error: pipe closed");
}

#[test]
fn test_p4_error_size() {
    // every variant is a thin Box: pointer + discriminant
    let size = std::mem::size_of::<P4Error>();
    assert!(size <= 16, "P4Error is {size} bytes, expected <= 16");
}

#[test]
fn test_p4_result_size() {
    let size = std::mem::size_of::<P4Result<()>>();
    assert!(size <= 24, "P4Result<()> is {size} bytes, expected <= 24");
}
