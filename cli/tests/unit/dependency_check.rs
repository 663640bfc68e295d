//! Tests for the on-demand dependency scan.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use lcagents_cli::application::services::dependency_check::{
    check_dependencies, dependency_index,
};
use lcagents_cli::domain::{DependencyKind, ResourceError, ResourceType};
use lcagents_cli::infra::fs::LocalFs;

use crate::helpers::{CORE, StaticCore, Tree, resolver};

fn names(deps: &[lcagents_cli::domain::ResourceDependency]) -> Vec<String> {
    let mut names: Vec<String> = deps.iter().map(|d| d.name.clone()).collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_agent_dependents_found_by_name_without_extension() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "story-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert!(result.has_active);
    assert!(!result.is_core);
    assert_eq!(result.dependencies.len(), 1);
    let dep = &result.dependencies[0];
    assert_eq!(dep.kind, DependencyKind::Agent);
    assert_eq!(dep.name, "dev");
    assert_eq!(dep.path, tree.path(&format!("core/.{CORE}/agents/dev.md")));
}

#[tokio::test]
async fn test_name_with_extension_finds_bare_references() {
    let tree = Tree::standard();
    tree.write(
        &format!("core/.{CORE}/agents/sm.md"),
        "```yaml\ndependencies:\n  templates: [story-tmpl]\n```\n",
    );
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    for requested in ["story-tmpl", "story-tmpl.yaml"] {
        let result = check_dependencies(&r, requested, ResourceType::Templates)
            .await
            .expect("check");
        assert_eq!(names(&result.dependencies), vec!["dev", "sm"], "requested {requested}");
    }
}

#[tokio::test]
async fn test_core_resource_is_flagged_and_lists_every_agent() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "prd-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert!(result.is_core);
    assert_eq!(names(&result.dependencies), vec!["dev", "pm"]);
}

#[tokio::test]
async fn test_resource_dependents_follow_agent_dependents() {
    let tree = Tree::standard();
    // An agent and a sibling resource both use arch-tmpl.
    tree.write(
        &format!("core/.{CORE}/agents/architect.md"),
        "```yaml\ndependencies:\n  templates: [arch-tmpl.md]\n```\n",
    );
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "arch-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    let kinds: Vec<DependencyKind> = result.dependencies.iter().map(|d| d.kind).collect();
    assert_eq!(kinds, vec![DependencyKind::Agent, DependencyKind::Resource]);
    assert_eq!(result.dependencies[0].name, "architect");
    assert_eq!(result.dependencies[1].name, "notes-tmpl");
    assert_eq!(result.dependencies[1].path, tree.path("custom/templates/notes-tmpl.md"));
}

#[tokio::test]
async fn test_agent_listing_target_in_several_categories_is_recorded_once() {
    let tree = Tree::standard();
    tree.write(
        &format!("core/.{CORE}/agents/sm.md"),
        "```yaml\ndependencies:\n  templates: [story-tmpl.yaml]\n  checklists: [story-tmpl]\n```\n",
    );
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "story-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert_eq!(names(&result.dependencies), vec!["dev", "sm"]);
}

#[tokio::test]
async fn test_unreadable_agent_is_skipped_not_fatal() {
    let tree = Tree::standard();
    tree.write(
        &format!("core/.{CORE}/agents/broken.md"),
        "```yaml\ndependencies: [unclosed\n```\n",
    );
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "story-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert_eq!(names(&result.dependencies), vec!["dev"]);
    assert_eq!(result.skipped, vec!["agent:broken"]);
}

#[tokio::test]
async fn test_unreadable_sibling_resource_is_skipped() {
    let tree = Tree::standard();
    tree.write("custom/templates/bad.yaml", "dependencies: [unclosed\n");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "arch-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert_eq!(names(&result.dependencies), vec!["notes-tmpl"]);
    assert_eq!(result.skipped, vec!["templates:bad"]);
}

#[tokio::test]
async fn test_resource_without_dependents() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let result = check_dependencies(&r, "notes-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert!(!result.has_active);
    assert!(result.dependencies.is_empty());
}

#[tokio::test]
async fn test_missing_resource_is_not_found() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let err = check_dependencies(&r, "ghost", ResourceType::Templates)
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ResourceError>(),
        Some(ResourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_check_reflects_edits_immediately() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let before = check_dependencies(&r, "story-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert!(before.has_active);

    tree.write(&format!("core/.{CORE}/agents/dev.md"), "# dev, no deps\n");
    let after = check_dependencies(&r, "story-tmpl", ResourceType::Templates)
        .await
        .expect("check");
    assert!(!after.has_active);
}

#[tokio::test]
async fn test_dependency_index_covers_every_listed_resource() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let index = dependency_index(&r, ResourceType::Templates)
        .await
        .expect("index");
    let keys: Vec<&str> = index.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["arch-tmpl", "notes-tmpl", "prd-tmpl", "story-tmpl"]);
    assert_eq!(names(&index["prd-tmpl"]), vec!["dev", "pm"]);
    assert_eq!(names(&index["arch-tmpl"]), vec!["notes-tmpl"]);
    assert!(index["notes-tmpl"].is_empty());
}
