// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! End-to-end tests against a fake `p4` shell script.
//!
//! The script logs every argv to a file and answers `info`, `clients` and
//! `edit` like a server that knows one client, `bob-ws`, rooted at the test
//! workspace.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command as Process;

use p4_workspace::config::Config;
use p4_workspace::p4::ClientName;
use p4_workspace::service::WorkspaceService;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

struct FakeServer {
    _dir: TempDir,
    workspace: PathBuf,
    program: PathBuf,
    log: PathBuf,
}

impl FakeServer {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("ws");
        std::fs::create_dir(&workspace).unwrap();
        let program = dir.path().join("p4");
        let log = dir.path().join("argv.log");

        let script = format!(
            r#"#!/bin/sh
printf '%s\n' "$*" >> '{log}'
for last; do :; done
case " $* " in
  *" info "*)
    printf 'User name: bob\nClient name: *unknown*\nClient host: buildbox\nCase Handling: sensitive\n'
    ;;
  *" clients "*)
    printf 'other-ws;/elsewhere;buildbox\nbob-ws;{root};BuildBox\n'
    ;;
  *" edit "*)
    chmod u+w "$last"
    printf '%s#1 - opened for edit\n' "$last"
    ;;
  *)
    echo "unknown command" >&2
    exit 1
    ;;
esac
"#,
            log = log.display(),
            root = workspace.display(),
        );
        std::fs::write(&program, script).unwrap();
        std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

        Self {
            _dir: dir,
            workspace,
            program,
            log,
        }
    }

    fn config(&self) -> Config {
        Config::parse(&format!("[p4]\nprogram = \"{}\"\n", self.program.display())).unwrap()
    }

    fn argv_log(&self) -> Vec<String> {
        std::fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(String::from)
            .collect()
    }

    fn readonly_file(&self, name: &str) -> PathBuf {
        let path = self.workspace.join(name);
        std::fs::write(&path, "contents").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o444)).unwrap();
        path
    }
}

fn is_writable(path: &Path) -> bool {
    !std::fs::metadata(path).unwrap().permissions().readonly()
}

#[tokio::test]
async fn resolves_through_clients_and_opens_for_edit() {
    let server = FakeServer::new();
    let service = WorkspaceService::from_config(&server.config(), CancellationToken::new());

    let results = service
        .notify_workspace_roots_changed(std::slice::from_ref(&server.workspace), &[])
        .await;
    assert_eq!(
        results[0].result.as_ref().unwrap(),
        &ClientName::new("bob-ws")
    );

    let file = server.readonly_file("main.c");
    assert!(service.ensure_editable(&file).await);
    assert!(is_writable(&file));

    assert_eq!(
        server.argv_log(),
        [
            "info".to_string(),
            "-ztag -F %client%;%Root%;%Host% clients -u bob".to_string(),
            format!("-c bob-ws edit {}", file.display()),
        ]
    );
}

#[tokio::test]
async fn failing_p4_leaves_workspace_unbound() {
    let server = FakeServer::new();
    let outside = tempfile::tempdir().unwrap();
    let service = WorkspaceService::from_config(&server.config(), CancellationToken::new());

    let results = service
        .notify_workspace_roots_changed(&[outside.path().to_path_buf()], &[])
        .await;
    assert!(results[0].result.is_err());
    assert!(service.binding(outside.path()).is_none());
}

#[test]
fn binary_resolve_prints_json() {
    let server = FakeServer::new();
    let output = Process::new(env!("CARGO_BIN_EXE_p4ws"))
        .arg("--no-default-config")
        .arg("--set")
        .arg(format!("p4.program={}", server.program.display()))
        .arg("--json")
        .arg("resolve")
        .arg(&server.workspace)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["roots"][0]["client"], "bob-ws");
}

#[test]
fn binary_serve_answers_requests() {
    use std::io::Write;

    let server = FakeServer::new();
    let file = server.readonly_file("a.txt");
    let mut child = Process::new(env!("CARGO_BIN_EXE_p4ws"))
        .arg("--no-default-config")
        .arg("--set")
        .arg(format!("p4.program={}", server.program.display()))
        .arg("serve")
        .stdin(std::process::Stdio::piped())
        .stdout(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    let requests = [
        serde_json::json!({"id": 1, "method": "roots_changed", "added": [server.workspace]}),
        serde_json::json!({"id": 2, "method": "shutdown"}),
    ];
    {
        let mut stdin = child.stdin.take().unwrap();
        for request in requests {
            writeln!(stdin, "{request}").unwrap();
        }
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let responses: Vec<serde_json::Value> = String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert_eq!(responses[0]["result"]["roots"][0]["client"], "bob-ws");
    assert_eq!(responses[1]["id"], 2);
    assert!(!is_writable(&file));
}
