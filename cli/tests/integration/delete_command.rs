//! Integration tests for `lcagents delete`, `backups` and `restore`.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use crate::cli_tests::{fixture, lcagents};

#[test]
fn test_delete_core_resource_is_refused() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["delete", "templates", "prd-tmpl", "--force", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot delete core resource"));
    assert!(root.join("core/.bmad-core/templates/prd-tmpl.yaml").is_file());
}

#[test]
fn test_delete_core_resource_json_error_code() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["delete", "templates", "prd-tmpl", "-y", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "CORE_RESOURCE_PROTECTED""#));
}

#[test]
fn test_delete_with_dependents_needs_force() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["delete", "templates", "story-tmpl", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1 active dependent(s): agent 'dev'"));
    assert!(root.join("custom/templates/story-tmpl.yaml").is_file());
}

#[test]
fn test_delete_with_dependents_json_lists_them() {
    let (_dir, root) = fixture();
    let output = lcagents(&root)
        .args(["delete", "templates", "story-tmpl.yaml", "-y", "--json"])
        .output()
        .expect("run");
    assert!(!output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["code"], "DEPENDENCIES_EXIST");
    assert_eq!(value["dependents"][0]["type"], "agent");
    assert_eq!(value["dependents"][0]["name"], "dev");
    assert!(root.join("custom/templates/story-tmpl.yaml").is_file());
}

#[test]
fn test_delete_without_core_system_fails() {
    let (_dir, root) = fixture();
    std::fs::write(root.join("config.yaml"), "{}\n").expect("write");
    lcagents(&root)
        .args(["delete", "templates", "arch-tmpl", "-y", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "NO_ACTIVE_CORE_SYSTEM""#));
    assert!(root.join("org/templates/arch-tmpl.md").is_file());
}

#[test]
fn test_delete_update_deps_then_restore() {
    let (_dir, root) = fixture();

    lcagents(&root)
        .args([
            "delete",
            "templates",
            "story-tmpl",
            "--force",
            "--update-deps",
            "-y",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Undo with: lcagents restore story-tmpl-"));
    assert!(!root.join("custom/templates/story-tmpl.yaml").exists());
    let dev = std::fs::read_to_string(root.join("core/.bmad-core/agents/dev.md")).expect("read");
    assert!(!dev.contains("story-tmpl"));
    assert!(dev.contains("prd-tmpl.yaml"));

    let output = lcagents(&root)
        .args(["backups", "--json"])
        .output()
        .expect("run");
    let backups: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let name = backups[0]["name"].as_str().expect("name").to_string();
    assert_eq!(backups[0]["metadata"]["resourceName"], "story-tmpl");

    lcagents(&root)
        .args(["restore", &name])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored"));
    assert_eq!(
        std::fs::read_to_string(root.join("custom/templates/story-tmpl.yaml")).expect("read"),
        "template:\n  id: story\n"
    );
}

#[test]
fn test_delete_skip_backup_json_outcome() {
    let (_dir, root) = fixture();
    let output = lcagents(&root)
        .args(["delete", "templates", "arch-tmpl", "--skip-backup", "-y", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(value["backupPath"], serde_json::Value::Null);
    assert!(!root.join("org/templates/arch-tmpl.md").exists());
    assert!(!root.join("backups").exists());
}

#[test]
fn test_restore_unknown_backup_fails() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .args(["restore", "nope", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(r#""code": "NOT_FOUND""#));
}

#[test]
fn test_backups_empty() {
    let (_dir, root) = fixture();
    lcagents(&root)
        .arg("backups")
        .assert()
        .success()
        .stdout(predicate::str::contains("No backups found."));
}
