//! Application service: find what depends on a resource.
//!
//! Dependents are derived on demand by scanning agent and resource
//! declarations; no reverse index is ever persisted. A single unreadable
//! agent or resource is logged and skipped so it cannot block the scan.

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::{CoreSystemRegistry, ResourceFs};
use crate::application::services::layer_resolver::LayerResolver;
use crate::domain::agent::{agent_dependencies, references};
use crate::domain::error::ResourceError;
use crate::domain::layer::{ResourceType, dependency_name};
use crate::domain::{DependencyCheckResult, DependencyKind, ResourceDependency};

/// One scanned declaration: who declares, where, and what it lists.
struct Declaration {
    kind: DependencyKind,
    name: String,
    path: PathBuf,
    entries: Vec<String>,
}

impl Declaration {
    fn declares(&self, target: &str) -> bool {
        self.entries.iter().any(|entry| references(entry, target))
    }

    fn to_dependency(&self) -> ResourceDependency {
        ResourceDependency {
            kind: self.kind,
            name: self.name.clone(),
            path: self.path.clone(),
        }
    }
}

/// Scan results plus the entries that could not be read.
#[derive(Default)]
struct Scan {
    declarations: Vec<Declaration>,
    skipped: Vec<String>,
}

async fn scan_agents<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    scan: &mut Scan,
) -> Result<()> {
    for agent_id in resolver.list_agents().await? {
        let loaded = match resolver.load_agent(&agent_id).await {
            Ok(agent) => agent_dependencies(&agent.content).map(|categories| (agent, categories)),
            Err(err) => Err(err),
        };
        match loaded {
            Ok((agent, categories)) => scan.declarations.push(Declaration {
                kind: DependencyKind::Agent,
                name: agent_id,
                path: agent.path.map(|p| p.core_path).unwrap_or_default(),
                entries: categories.into_values().flatten().collect(),
            }),
            Err(err) => {
                tracing::warn!(agent = %agent_id, error = %format!("{err:#}"), "skipping unreadable agent in dependency scan");
                scan.skipped.push(format!("agent:{agent_id}"));
            }
        }
    }
    Ok(())
}

async fn scan_resources<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    ty: ResourceType,
    scan: &mut Scan,
) -> Result<()> {
    for resource in resolver.list_resources(ty).await? {
        // Core agent definitions were already scanned as agents.
        if scan.declarations.iter().any(|decl| decl.path == resource.path) {
            continue;
        }
        match resolver.metadata_at(&resource).await {
            Ok(meta) => scan.declarations.push(Declaration {
                kind: DependencyKind::Resource,
                name: meta.name,
                path: meta.path,
                entries: meta.dependencies,
            }),
            Err(err) => {
                tracing::warn!(resource = %resource.path.display(), error = %format!("{err:#}"), "skipping unreadable resource in dependency scan");
                scan.skipped.push(format!("{ty}:{}", resource.name));
            }
        }
    }
    Ok(())
}

/// Dependents of `target` in scan order: agents first, then resources.
/// `target` is the extension-less name (see [`dependency_name`]). The
/// target never counts as its own dependent.
fn dependents_of(scan: &Scan, target: &str) -> Vec<ResourceDependency> {
    scan.declarations
        .iter()
        .filter(|decl| !(decl.kind == DependencyKind::Resource && decl.name == target))
        .filter(|decl| decl.declares(target))
        .map(Declaration::to_dependency)
        .collect()
}

/// Determine what depends on a resource and whether it is core.
///
/// Steps:
/// 1. Resolve the resource through the layers; `resource_name` may carry
///    the file extension
/// 2. Flag it as core if it lives under the active core system
/// 3. Scan every agent's dependency arrays
/// 4. Scan every sibling resource of the same type
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if the resource does not resolve, or
/// an error if a layer directory cannot be listed.
pub async fn check_dependencies<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    resource_name: &str,
    resource_type: ResourceType,
) -> Result<DependencyCheckResult> {
    let path = resolver
        .resource_path(resource_type, resource_name)
        .await?
        .ok_or_else(|| ResourceError::not_found(resource_type, resource_name))?;
    let is_core = resolver.is_core_path(&path);

    let mut scan = Scan::default();
    scan_agents(resolver, &mut scan).await?;
    scan_resources(resolver, resource_type, &mut scan).await?;

    let dependencies = dependents_of(&scan, &dependency_name(&path, resource_name));
    tracing::debug!(
        resource = resource_name,
        resource_type = %resource_type,
        dependents = dependencies.len(),
        is_core,
        "dependency check complete"
    );
    Ok(DependencyCheckResult::new(dependencies, is_core).with_skipped(scan.skipped))
}

/// Reverse index `name → dependents` for every resource of `ty`, rebuilt
/// from the declarations on each call.
///
/// # Errors
///
/// Returns an error if a layer directory cannot be listed.
pub async fn dependency_index<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    ty: ResourceType,
) -> Result<BTreeMap<String, Vec<ResourceDependency>>> {
    let mut scan = Scan::default();
    scan_agents(resolver, &mut scan).await?;
    scan_resources(resolver, ty, &mut scan).await?;

    let mut index = BTreeMap::new();
    for resource in resolver.list_resources(ty).await? {
        if !index.contains_key(&resource.name) {
            let dependents = dependents_of(&scan, &resource.name);
            index.insert(resource.name, dependents);
        }
    }
    Ok(index)
}
