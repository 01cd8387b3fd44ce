// p4-workspace: Perforce workspace resolution
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use super::p4config::{ConfigMatch, client_from_settings, find_client, parse_config};
use super::paths::{is_same_or_relative_to_with, normalize};
use super::{BindingState, WorkspaceFolders, WorkspaceResolver, default_strategies};
use crate::config::types::ResolveConfig;
use crate::error::{P4Error, WorkspaceError};
use crate::p4::parse::CaseHandling;
use crate::p4::test_utils::{ScriptedRunner, executor};
use crate::p4::{ClientName, CommandResult};

const ROOT: &str = "/p4ws-test/ws/proj";

fn keys() -> Vec<String> {
    vec!["P4CLIENT".to_string(), "CLIENT".to_string()]
}

fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn resolver(runner: &Arc<ScriptedRunner>) -> WorkspaceResolver {
    WorkspaceResolver::new(
        executor(runner),
        default_strategies(&ResolveConfig::default(), None),
    )
}

fn info_output(client: &str, client_root: &str) -> CommandResult {
    CommandResult::success(format!(
        "User name: bob\nClient name: {client}\nClient host: buildbox\nClient root: {client_root}\n"
    ))
}

fn is_workspace_error(err: &P4Error, expected: &WorkspaceError) -> bool {
    matches!(err, P4Error::Workspace(e) if **e == *expected)
}

// --- paths ---

#[test]
fn test_containment_examples() {
    let sensitive = CaseHandling::Sensitive;
    let check = |candidate: &str, base: &str| {
        is_same_or_relative_to_with(Path::new(candidate), Path::new(base), sensitive)
    };

    assert!(check("/ws/proj/src", "/ws/proj"));
    assert!(check("/ws/proj", "/ws/proj"));
    assert!(check("/ws/proj/", "/ws/proj"));
    assert!(check("/ws/proj/src", "/ws/proj/"));
    assert!(!check("/ws/other", "/ws/proj"));
    assert!(!check("/ws", "/ws/proj"));
    assert!(!check("/ws/project", "/ws/proj"));
    assert!(!check("/ws/proj/../other", "/ws/proj"));
    assert!(check("/ws/other/../proj/src", "/ws/proj"));
    assert!(!check("ws/proj", "/ws/proj"));
}

#[test]
fn test_containment_case_handling() {
    let candidate = Path::new("/WS/Proj/src");
    let base = Path::new("/ws/proj");
    assert!(!is_same_or_relative_to_with(candidate, base, CaseHandling::Sensitive));
    assert!(is_same_or_relative_to_with(candidate, base, CaseHandling::Insensitive));
}

#[test]
fn test_normalize() {
    assert_eq!(normalize(Path::new("/a/./b/../c/")), PathBuf::from("/a/c"));
    assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
    assert_eq!(normalize(Path::new("../a/..")), PathBuf::from(".."));
    assert_eq!(normalize(Path::new("./")), PathBuf::from("."));
}

// --- p4config ---

#[test]
fn test_parse_config_last_write_wins() {
    let settings = parse_config("CLIENT=first\nP4PORT=perforce:1666\nCLIENT=second\n");
    assert_eq!(settings.get("CLIENT").map(String::as_str), Some("second"));
    assert_eq!(settings.get("P4PORT").map(String::as_str), Some("perforce:1666"));
}

#[test]
fn test_parse_config_skips_noise() {
    let settings = parse_config("# comment\r\n\r\n  P4CLIENT = bob-ws \r\nnoequals\n=orphan\nP4PASSWD=a=b\n");
    assert_eq!(settings.len(), 2);
    assert_eq!(settings.get("P4CLIENT").map(String::as_str), Some("bob-ws"));
    assert_eq!(settings.get("P4PASSWD").map(String::as_str), Some("a=b"));
}

#[test]
fn test_client_key_priority() {
    let settings = parse_config("CLIENT=legacy\nP4CLIENT=modern\n");
    assert_eq!(
        client_from_settings(&settings, &keys()),
        Some(ClientName::new("modern"))
    );

    let empty = parse_config("P4CLIENT=\nCLIENT=legacy\n");
    assert_eq!(
        client_from_settings(&empty, &keys()),
        Some(ClientName::new("legacy"))
    );
}

#[tokio::test]
async fn test_find_client_walks_upward() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a/b/c");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(dir.path().join("a/.p4config"), "P4CLIENT=outer\n").unwrap();

    let found = find_client(&root, &names(&[".p4config"]), &keys()).await;
    assert_eq!(
        found,
        Some(ConfigMatch {
            file: dir.path().join("a/.p4config"),
            client: ClientName::new("outer"),
        })
    );
}

#[tokio::test]
async fn test_find_client_deepest_match_wins() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a/b");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(dir.path().join("a/.p4config"), "P4CLIENT=outer\n").unwrap();
    std::fs::write(root.join(".p4config"), "P4CLIENT=inner\n").unwrap();

    let found = find_client(&root, &names(&[".p4config"]), &keys()).await;
    assert_eq!(found.map(|m| m.client), Some(ClientName::new("inner")));
}

#[tokio::test]
async fn test_find_client_skips_files_without_client() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a/b");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(dir.path().join("a/.p4config"), "CLIENT=outer\n").unwrap();
    std::fs::write(root.join(".p4config"), "P4PORT=perforce:1666\n").unwrap();

    let found = find_client(&root, &names(&[".p4config"]), &keys()).await;
    assert_eq!(found.map(|m| m.client), Some(ClientName::new("outer")));
}

#[tokio::test]
async fn test_find_client_name_order_before_depth() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a/b");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join("P4CONFIG"), "P4CLIENT=fallback\n").unwrap();
    std::fs::write(dir.path().join("a/p4.cfg"), "P4CLIENT=from-env-name\n").unwrap();

    let found = find_client(&root, &names(&["p4.cfg", ".p4config", "P4CONFIG"]), &keys()).await;
    assert_eq!(found.map(|m| m.client), Some(ClientName::new("from-env-name")));
}

#[tokio::test]
async fn test_find_client_ignores_directories_and_missing() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a");
    std::fs::create_dir_all(root.join(".p4config")).unwrap();

    let found = find_client(&root, &names(&[".p4config"]), &keys()).await;
    assert!(found.is_none());
}

#[cfg(unix)]
#[tokio::test]
async fn test_find_client_unreadable_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("a");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(root.join(".p4config"), b"P4CLIENT=\xff\xfe\n").unwrap();
    std::fs::write(dir.path().join(".p4config"), "P4CLIENT=outer\n").unwrap();

    let found = find_client(&root, &names(&[".p4config"]), &keys()).await;
    assert_eq!(found.map(|m| m.client), Some(ClientName::new("outer")));
}

// --- folders ---

#[test]
fn test_folders_deepest_root_wins() {
    let folders = WorkspaceFolders::new();
    folders.add(Path::new("/ws"));
    folders.add(Path::new("/ws/proj/"));
    folders.add(Path::new("/other"));

    assert_eq!(
        folders.folder_for(Path::new("/ws/proj/src/main.c")),
        Some(PathBuf::from("/ws/proj"))
    );
    assert_eq!(
        folders.folder_for(Path::new("/ws/readme.txt")),
        Some(PathBuf::from("/ws"))
    );
    assert_eq!(folders.folder_for(Path::new("/elsewhere/x")), None);
}

#[test]
fn test_folders_add_remove() {
    let folders = WorkspaceFolders::new();
    assert_eq!(folders.add(Path::new("/ws/./proj")), (PathBuf::from("/ws/proj"), true));
    assert_eq!(folders.add(Path::new("/ws/proj")), (PathBuf::from("/ws/proj"), false));
    assert!(folders.contains(Path::new("/ws/proj/")));
    assert!(folders.remove(Path::new("/ws/proj")));
    assert!(!folders.remove(Path::new("/ws/proj")));
    assert!(folders.roots().is_empty());
}

// --- resolver ---

#[tokio::test]
async fn test_resolve_prefers_p4config_without_p4() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("proj");
    std::fs::create_dir_all(&root).unwrap();
    std::fs::write(dir.path().join(".p4config"), "CLIENT=explicit\n").unwrap();

    let runner = Arc::new(
        ScriptedRunner::new().respond("info", info_output("other-ws", &root.to_string_lossy())),
    );
    let resolver = resolver(&runner);

    let client = resolver.resolve(&root).await.unwrap();
    assert_eq!(client, ClientName::new("explicit"));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_resolve_from_info() {
    let runner = Arc::new(ScriptedRunner::new().respond("info", info_output("bob-ws", "/p4ws-test/ws")));
    let resolver = resolver(&runner);

    let client = resolver.resolve(Path::new(ROOT)).await.unwrap();
    assert_eq!(client, ClientName::new("bob-ws"));
    assert_eq!(runner.count("info"), 1);
    assert_eq!(runner.count("clients"), 0);

    let calls = runner.calls();
    assert_eq!(calls[0].cwd(), Path::new(ROOT));
    assert!(calls[0].client().is_none());
}

#[tokio::test]
async fn test_resolve_from_clients_matches_host_and_root() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .respond("info", info_output("default-ws", "/elsewhere"))
            .respond(
                "clients",
                CommandResult::success(
                    "wrong-host;/p4ws-test/ws;laptop\n\
                     wrong-root;/p4ws-test/other;buildbox\n\
                     broken;/p4ws-test\n\
                     right;/p4ws-test/ws;BUILDBOX\n\
                     later;/p4ws-test;buildbox\n",
                ),
            ),
    );
    let resolver = resolver(&runner);

    let client = resolver.resolve(Path::new(ROOT)).await.unwrap();
    assert_eq!(client, ClientName::new("right"));
    assert_eq!(runner.count("info"), 1);

    let clients_call = runner
        .calls()
        .into_iter()
        .find(|c| c.command() == "clients")
        .unwrap();
    assert_eq!(
        clients_call.argv(),
        ["-ztag", "-F", "%client%;%Root%;%Host%", "clients", "-u", "bob"]
    );
}

#[tokio::test]
async fn test_resolve_clients_honours_host_override() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .respond("info", info_output("default-ws", "/elsewhere"))
            .respond(
                "clients",
                CommandResult::success("on-box;/p4ws-test/ws;buildbox\non-vm;/p4ws-test/ws;vm01\n"),
            ),
    );
    let settings = ResolveConfig {
        host: "vm01".to_string(),
        ..ResolveConfig::default()
    };
    let resolver = WorkspaceResolver::new(executor(&runner), default_strategies(&settings, None));

    let client = resolver.resolve(Path::new(ROOT)).await.unwrap();
    assert_eq!(client, ClientName::new("on-vm"));
}

#[tokio::test]
async fn test_resolve_case_insensitive_server() {
    let runner = Arc::new(ScriptedRunner::new().respond(
        "info",
        CommandResult::success(
            "User name: bob\nClient name: bob-ws\nClient root: /P4WS-TEST/WS\nCase Handling: insensitive\n",
        ),
    ));
    let resolver = resolver(&runner);

    let client = resolver.resolve(Path::new(ROOT)).await.unwrap();
    assert_eq!(client, ClientName::new("bob-ws"));
}

#[tokio::test]
async fn test_resolve_failure_is_cached_until_forgotten() {
    let runner = Arc::new(ScriptedRunner::new().respond("info", info_output("x", "/elsewhere")));
    let resolver = resolver(&runner);
    let root = Path::new(ROOT);

    let err = resolver.resolve(root).await.unwrap_err();
    assert!(is_workspace_error(&err, &WorkspaceError::unresolved(root)));
    insta::assert_snapshot!(
        err.to_string(),
        @"workspace error: no client found for workspace '/p4ws-test/ws/proj'"
    );
    assert_eq!(resolver.state(root), BindingState::Failed);
    // `clients` is unknown to the scripted runner and fails.
    assert_eq!(runner.count("info"), 1);
    assert_eq!(runner.count("clients"), 1);

    assert!(resolver.resolve(root).await.is_err());
    assert_eq!(runner.count("info"), 1);

    assert!(resolver.forget_failure(root));
    assert_eq!(resolver.state(root), BindingState::Unresolved);
    assert!(resolver.resolve(root).await.is_err());
    assert_eq!(runner.count("info"), 2);
}

#[tokio::test]
async fn test_resolve_launch_failure_falls_through() {
    let runner = Arc::new(ScriptedRunner::new().fail_launch("info"));
    let resolver = resolver(&runner);

    assert!(resolver.resolve(Path::new(ROOT)).await.is_err());
    assert_eq!(runner.count("info"), 1);
    assert_eq!(runner.count("clients"), 0);
}

#[tokio::test]
async fn test_resolve_is_idempotent() {
    let runner = Arc::new(ScriptedRunner::new().respond("info", info_output("bob-ws", "/p4ws-test/ws")));
    let resolver = resolver(&runner);

    let first = resolver.resolve(Path::new(ROOT)).await.unwrap();
    let second = resolver.resolve(Path::new("/p4ws-test/ws/proj/")).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(runner.count("info"), 1);
    assert_eq!(resolver.binding(Path::new(ROOT)), Some(first.clone()));
    assert_eq!(resolver.state(Path::new(ROOT)), BindingState::Bound(first));
    assert!(!resolver.forget_failure(Path::new(ROOT)));
}

#[tokio::test]
async fn test_concurrent_resolves_share_one_attempt() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .respond("info", info_output("bob-ws", "/p4ws-test/ws"))
            .with_delay(Duration::from_millis(50)),
    );
    let resolver = resolver(&runner);
    let root = Path::new(ROOT);

    let (a, b, c) = tokio::join!(
        resolver.resolve(root),
        resolver.resolve(root),
        resolver.resolve(root)
    );
    assert_eq!(a.unwrap(), ClientName::new("bob-ws"));
    assert_eq!(b.unwrap(), ClientName::new("bob-ws"));
    assert_eq!(c.unwrap(), ClientName::new("bob-ws"));
    assert_eq!(runner.count("info"), 1);
}

#[tokio::test]
async fn test_roots_resolve_independently() {
    let runner = Arc::new(ScriptedRunner::new().respond("info", info_output("bob-ws", "/p4ws-test/ws")));
    let resolver = resolver(&runner);

    assert!(resolver.resolve(Path::new("/p4ws-test/outside")).await.is_err());
    assert!(resolver.resolve(Path::new(ROOT)).await.is_ok());

    let states = resolver.states();
    assert_eq!(
        states,
        vec![
            (PathBuf::from("/p4ws-test/outside"), BindingState::Failed),
            (
                PathBuf::from(ROOT),
                BindingState::Bound(ClientName::new("bob-ws"))
            ),
        ]
    );
}

#[test]
fn test_binding_state_json() {
    let bound = serde_json::to_string(&BindingState::Bound(ClientName::new("bob-ws"))).unwrap();
    assert_eq!(bound, r#"{"state":"bound","client":"bob-ws"}"#);
    let failed = serde_json::to_string(&BindingState::Failed).unwrap();
    assert_eq!(failed, r#"{"state":"failed"}"#);
}

// --- scoped execution ---

#[tokio::test]
async fn test_execute_in_workspace_requires_folder() {
    let runner = Arc::new(ScriptedRunner::new());
    let resolver = resolver(&runner);

    let file = Path::new("/p4ws-test/loose/a.txt");
    let err = resolver
        .execute_in_workspace(file, "edit", &["/p4ws-test/loose/a.txt"])
        .await
        .unwrap_err();
    assert!(is_workspace_error(&err, &WorkspaceError::no_folder(file)));
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_execute_in_workspace_requires_binding() {
    let runner = Arc::new(ScriptedRunner::new());
    let resolver = resolver(&runner);
    resolver.folders().add(Path::new(ROOT));

    let err = resolver
        .execute_in_workspace(Path::new("/p4ws-test/ws/proj/a.txt"), "edit", &[])
        .await
        .unwrap_err();
    assert!(is_workspace_error(&err, &WorkspaceError::no_binding(Path::new(ROOT))));
    insta::assert_snapshot!(
        err.to_string(),
        @"workspace error: no perforce client bound to workspace '/p4ws-test/ws/proj'"
    );
    assert!(runner.calls().is_empty());
}

#[tokio::test]
async fn test_execute_in_workspace_scopes_to_client() {
    let runner = Arc::new(
        ScriptedRunner::new()
            .respond("info", info_output("bob-ws", "/p4ws-test/ws"))
            .respond("edit", CommandResult::success("//depot/proj/a.txt#3 - opened for edit")),
    );
    let resolver = resolver(&runner);
    resolver.folders().add(Path::new(ROOT));
    resolver.resolve(Path::new(ROOT)).await.unwrap();

    let result = resolver
        .execute_in_workspace(
            Path::new("/p4ws-test/ws/proj/a.txt"),
            "edit",
            &["/p4ws-test/ws/proj/a.txt"],
        )
        .await
        .unwrap();
    assert!(result.succeeded());

    let edit = runner.calls().into_iter().find(|c| c.command() == "edit").unwrap();
    assert_eq!(edit.argv(), ["-c", "bob-ws", "edit", "/p4ws-test/ws/proj/a.txt"]);
    assert_eq!(edit.cwd(), Path::new(ROOT));
}
