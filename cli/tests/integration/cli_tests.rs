//! Integration tests for argument parsing and the read-only commands.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `lcagents` with colors off and the given root.
pub fn lcagents(root: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lcagents"));
    cmd.env("NO_COLOR", "1")
        .env_remove("LCAGENTS_LOG")
        .env_remove("CI")
        .env("LCAGENTS_ROOT", root);
    cmd
}

/// A `.lcagents` tree with an active `bmad-core` core system, a core
/// template used by the `dev` agent and a custom template used by `dev`.
pub fn fixture() -> (TempDir, std::path::PathBuf) {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().join(".lcagents");
    let files = [
        ("config.yaml", "core-system: bmad-core\n"),
        (
            "core/.bmad-core/agents/dev.md",
            "# dev\n\n```yaml\ndependencies:\n  templates:\n    - prd-tmpl.yaml\n    - story-tmpl.yaml\n```\n",
        ),
        ("core/.bmad-core/templates/prd-tmpl.yaml", "template:\n  id: prd\n"),
        ("custom/templates/story-tmpl.yaml", "template:\n  id: story\n"),
        ("org/templates/arch-tmpl.md", "# Architecture\n"),
    ];
    for (rel, content) in files {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        std::fs::write(path, content).expect("write");
    }
    (dir, root)
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().expect("run");
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

// --- Help and version tests ---

#[test]
fn test_cli_no_args_shows_help() {
    let dir = TempDir::new().expect("temp dir");
    // clap with arg_required_else_help shows help on stderr and exits 2
    lcagents(dir.path()).assert().code(2).stderr(predicate::str::contains(
        "Layered agent resources",
    ));
}

#[test]
fn test_cli_help_lists_commands() {
    let dir = TempDir::new().expect("temp dir");
    lcagents(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("delete"))
        .stdout(predicate::str::contains("restore"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn test_cli_version_flag_shows_version() {
    let dir = TempDir::new().expect("temp dir");
    lcagents(dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("lcagents"));
}

#[test]
fn test_unknown_resource_type_is_rejected() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["list", "widgets"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown resource type"));
}

// --- list / resolve / template / check ---

#[test]
fn test_list_templates_shows_every_layer() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["list", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("prd-tmpl"))
        .stdout(predicate::str::contains("[core]"))
        .stdout(predicate::str::contains("[org]"))
        .stdout(predicate::str::contains("[custom]"));
}

#[test]
fn test_list_accepts_singular_type_and_json() {
    let (_dir, root) = fixture();
    let value = json_stdout(lcagents(&root).args(["list", "template", "--json"]));
    assert_eq!(value["type"], "templates");
    assert_eq!(value["resources"].as_array().expect("array").len(), 3);
}

#[test]
fn test_resolve_agent_json() {
    let (_dir, root) = fixture();
    let value = json_stdout(lcagents(&root).args(["resolve", "dev", "--json"]));
    assert_eq!(value["coreSystem"], "bmad-core");
    assert_eq!(value["layerSources"], serde_json::json!(["core"]));
}

#[test]
fn test_resolve_agent_without_core_system_succeeds_unresolved() {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().join(".lcagents");
    let value = json_stdout(lcagents(&root).args(["resolve", "dev", "--json"]));
    assert_eq!(value["coreSystem"], "");
    assert_eq!(value["layerSources"], serde_json::json!([]));
}

#[test]
fn test_template_resolves_most_specific_layer() {
    let (_dir, root) = fixture();
    std::fs::write(root.join("custom/templates/arch-tmpl.md"), "# mine\n").expect("write");
    let value = json_stdout(lcagents(&root).args(["template", "arch-tmpl", "--json"]));
    assert_eq!(value["source"], "custom");
}

#[test]
fn test_template_not_found_json_error() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["template", "ghost", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "NOT_FOUND""#));
}

#[test]
fn test_check_reports_dependents() {
    let (_dir, root) = fixture();
    let value = json_stdout(lcagents(&root).args(["check", "templates", "story-tmpl", "--json"]));
    assert_eq!(value["hasActive"], true);
    assert_eq!(value["isCore"], false);
    assert_eq!(value["dependencies"][0]["type"], "agent");
    assert_eq!(value["dependencies"][0]["name"], "dev");
}

#[test]
fn test_check_flags_core_resource() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["check", "templates", "prd-tmpl"])
        .assert()
        .success()
        .stdout(predicate::str::contains("core resource"));
}

// --- init / migrate ---

#[test]
fn test_init_creates_layered_structure() {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().join(".lcagents");
    lcagents(&root)
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Layered structure ready"));
    assert!(root.join("org/agents/overrides").is_dir());
    assert!(root.join("custom/templates").is_dir());
    assert!(root.join("backups").is_dir());
}

#[test]
fn test_migrate_moves_flat_tree() {
    let dir = TempDir::new().expect("temp dir");
    let root = dir.path().join(".lcagents");
    std::fs::create_dir_all(root.join("tasks")).expect("mkdir");
    std::fs::write(root.join("tasks/create-doc.md"), "# doc\n").expect("write");

    let value = json_stdout(lcagents(&root).args(["migrate", "bmad-core", "--json"]));
    assert_eq!(value["moved"], serde_json::json!(["tasks"]));
    assert!(root.join("core/.bmad-core/tasks/create-doc.md").is_file());
    assert!(!root.join("tasks").exists());
}
