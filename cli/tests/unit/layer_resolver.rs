//! Tests for `LayerResolver`: precedence, listing, agent resolution.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use lcagents_cli::domain::{
    AgentDefinition, AgentResolution, Layer, ResourceError, ResourceType,
};
use lcagents_cli::infra::fs::LocalFs;

use crate::helpers::{CORE, StaticCore, Tree, resolver};

#[tokio::test]
async fn test_custom_overrides_org_overrides_core() {
    let tree = Tree::standard();
    tree.write(&format!("core/.{CORE}/templates/shared.md"), "core");
    tree.write("org/templates/shared.md", "org");
    tree.write("custom/templates/shared.md", "custom");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let found = r.resolve_template("shared").await.expect("resolve");
    assert_eq!(found.source, Layer::Custom);
    assert_eq!(r.read_resource(ResourceType::Templates, "shared").await.expect("read"), "custom");

    std::fs::remove_file(tree.path("custom/templates/shared.md")).expect("rm");
    let found = r.resolve_template("shared").await.expect("resolve");
    assert_eq!(found.source, Layer::Org);

    std::fs::remove_file(tree.path("org/templates/shared.md")).expect("rm");
    let found = r.resolve_template("shared").await.expect("resolve");
    assert_eq!(found.source, Layer::Core);
}

#[tokio::test]
async fn test_name_matches_exactly_or_with_known_extension() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let bare = r.resolve_template("arch-tmpl").await.expect("bare");
    let exact = r.resolve_template("arch-tmpl.md").await.expect("exact");
    assert_eq!(bare.path, tree.path("org/templates/arch-tmpl.md"));
    assert_eq!(bare.path, exact.path);
    assert!(r.resolve_template("arch").await.is_err());
}

#[tokio::test]
async fn test_resolve_template_not_found_is_typed() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let err = r.resolve_template("nope").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ResourceError>(),
        Some(ResourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_path_traversal_names_are_rejected() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    for name in ["../config", "a/b", "", ".."] {
        let err = r
            .resource_path(ResourceType::Templates, name)
            .await
            .unwrap_err();
        assert!(
            matches!(err.downcast_ref::<ResourceError>(), Some(ResourceError::InvalidArgument(_))),
            "name {name:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_list_resources_covers_every_layer_in_order() {
    let tree = Tree::standard();
    tree.write("custom/templates/arch-tmpl.md", "# custom arch\n");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let listed = r
        .list_resources(ResourceType::Templates)
        .await
        .expect("list");
    let sources: Vec<Layer> = listed.iter().map(|res| res.source).collect();
    let mut sorted = sources.clone();
    sorted.sort();
    assert_eq!(sources, sorted, "core entries first, then org, then custom");

    // A name present in two layers is listed once per layer.
    let arch: Vec<Layer> = listed
        .iter()
        .filter(|res| res.name == "arch-tmpl")
        .map(|res| res.source)
        .collect();
    assert_eq!(arch, vec![Layer::Org, Layer::Custom]);
    assert_eq!(listed.len(), 5);
}

#[tokio::test]
async fn test_list_resources_skips_agent_overrides_and_hidden_entries() {
    let tree = Tree::standard();
    tree.write("org/agents/overrides/dev.yaml", "persona: terse\n");
    tree.write("org/agents/helper.md", "# helper\n");
    tree.write("custom/agents/.DS_Store", "");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let mut names: Vec<String> = r
        .list_resources(ResourceType::Agents)
        .await
        .expect("list")
        .into_iter()
        .map(|res| res.name)
        .collect();
    names.sort();
    assert_eq!(names, vec!["dev", "helper", "pm"]);
}

#[tokio::test]
async fn test_every_listed_name_resolves() {
    let tree = Tree::standard();
    tree.write("custom/templates/My Template.md", "# spaced\n");
    tree.write("custom/templates/odd..name.md", "# unreachable\n");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let listed = r
        .list_resources(ResourceType::Templates)
        .await
        .expect("list");
    assert!(listed.iter().any(|res| res.name == "My Template"));
    assert!(listed.iter().all(|res| res.name != "odd..name"));
    for res in &listed {
        let found = r
            .resource_path(ResourceType::Templates, &res.name)
            .await
            .expect("listed name is valid");
        assert!(found.is_some(), "{} does not resolve", res.name);
    }
}

#[tokio::test]
async fn test_without_core_system_only_org_and_custom_resolve() {
    let tree = Tree::standard();
    let registry = StaticCore::none();
    let r = resolver(&LocalFs, &registry, &tree);

    assert!(
        r.resource_path(ResourceType::Templates, "prd-tmpl")
            .await
            .expect("lookup")
            .is_none()
    );
    assert!(
        r.resource_path(ResourceType::Templates, "arch-tmpl")
            .await
            .expect("lookup")
            .is_some()
    );
    assert!(r.list_agents().await.expect("agents").is_empty());
}

#[tokio::test]
async fn test_core_resource_path_ignores_overrides() {
    let tree = Tree::standard();
    tree.write("custom/templates/prd-tmpl.yaml", "template:\n  id: mine\n");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let effective = r
        .resource_path(ResourceType::Templates, "prd-tmpl")
        .await
        .expect("lookup")
        .expect("found");
    let core = r
        .core_resource_path(ResourceType::Templates, "prd-tmpl")
        .await
        .expect("lookup")
        .expect("found");
    assert_eq!(effective, tree.path("custom/templates/prd-tmpl.yaml"));
    assert_eq!(core, tree.path(&format!("core/.{CORE}/templates/prd-tmpl.yaml")));
    assert!(r.is_core_path(&core));
    assert!(!r.is_core_path(&effective));
}

// ── Agents ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_resolve_agent_core_only() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let AgentResolution::Resolved(path) = r.resolve_agent("dev", None).await else {
        panic!("expected a resolution");
    };
    assert_eq!(path.core_system, CORE);
    assert_eq!(path.core_path, tree.path(&format!("core/.{CORE}/agents/dev.md")));
    assert_eq!(path.final_path, path.core_path);
    assert_eq!(path.layer_sources, vec![Layer::Core]);
}

#[tokio::test]
async fn test_resolve_agent_collects_override_layers() {
    let tree = Tree::standard();
    tree.write("org/agents/overrides/dev.yaml", "persona: org\n");
    tree.write("custom/agents/overrides/dev.yaml", "persona: custom\n");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let path = r.resolve_agent("dev", None).await.into_path();
    assert_eq!(path.layer_sources, vec![Layer::Core, Layer::Org, Layer::Custom]);
    assert_eq!(path.final_path, tree.path("custom/agents/overrides/dev.yaml"));

    std::fs::remove_file(tree.path("custom/agents/overrides/dev.yaml")).expect("rm");
    let path = r.resolve_agent("dev", None).await.into_path();
    assert_eq!(path.layer_sources, vec![Layer::Core, Layer::Org]);
    assert_eq!(path.final_path, tree.path("org/agents/overrides/dev.yaml"));
}

#[tokio::test]
async fn test_resolve_agent_without_core_system_is_unconfigured() {
    let tree = Tree::standard();
    let registry = StaticCore::none();
    let r = resolver(&LocalFs, &registry, &tree);

    let resolution = r.resolve_agent("dev", None).await;
    assert_eq!(resolution, AgentResolution::Unconfigured);
    let flat = resolution.into_path();
    assert!(flat.is_unresolved());
    assert!(flat.layer_sources.is_empty());
}

#[tokio::test]
async fn test_resolve_agent_core_system_override() {
    let tree = Tree::standard();
    let registry = StaticCore::none();
    let r = resolver(&LocalFs, &registry, &tree);

    let path = r.resolve_agent("dev", Some("other-core")).await.into_path();
    assert_eq!(path.core_system, "other-core");
    assert_eq!(path.core_path, tree.path("core/.other-core/agents/dev.md"));
}

#[tokio::test]
async fn test_list_agents_reads_core_definitions() {
    let tree = Tree::standard();
    tree.write(&format!("core/.{CORE}/agents/README.txt"), "not an agent");
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let mut agents = r.list_agents().await.expect("list");
    agents.sort();
    assert_eq!(agents, vec!["dev", "pm"]);
}

#[tokio::test]
async fn test_load_and_save_agent_round_trip() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let mut agent = r.load_agent("pm").await.expect("load");
    assert!(agent.content.contains("prd-tmpl.yaml"));
    agent.content.push_str("\nEdited.\n");
    r.save_agent(&agent).await.expect("save");
    assert!(tree.read(&format!("core/.{CORE}/agents/pm.md")).ends_with("Edited.\n"));
}

#[tokio::test]
async fn test_load_agent_missing_is_not_found() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let err = r.load_agent("ghost").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ResourceError>(),
        Some(ResourceError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_save_agent_without_path_is_invalid_argument() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let agent = AgentDefinition {
        name: "dev".to_string(),
        content: "# dev\n".to_string(),
        path: None,
    };
    let err = r.save_agent(&agent).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ResourceError>(),
        Some(ResourceError::InvalidArgument(_))
    ));
    assert_eq!(tree.read(&format!("core/.{CORE}/agents/dev.md")), crate::helpers::DEV_AGENT);
}

#[tokio::test]
async fn test_resource_metadata_reads_declared_dependencies() {
    let tree = Tree::standard();
    let registry = StaticCore::active();
    let r = resolver(&LocalFs, &registry, &tree);

    let meta = r
        .resource_metadata(ResourceType::Templates, "notes-tmpl")
        .await
        .expect("metadata");
    assert_eq!(meta.source, Layer::Custom);
    assert_eq!(meta.dependencies, vec!["arch-tmpl"]);

    let meta = r
        .resource_metadata(ResourceType::Templates, "story-tmpl")
        .await
        .expect("metadata");
    assert!(meta.dependencies.is_empty());
}
