//! Application service: delete a layered resource without breaking
//! dependents or the core layer, and restore it from a backup.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{CoreSystemRegistry, ProgressReporter, ResourceFs};
use crate::application::services::backup_store::{create_backup, resolve_backup, restore_backup};
use crate::application::services::dependency_check::check_dependencies;
use crate::application::services::layer_resolver::LayerResolver;
use crate::domain::agent::remove_dependency;
use crate::domain::error::ResourceError;
use crate::domain::layer::{ResourceType, dependency_name};
use crate::domain::{BackupMetadata, DependencyCheckResult, ResourceDependency};

/// Caller-selected behaviour of a delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    /// Delete even when dependents exist.
    pub force: bool,
    /// Drop the resource from every dependent agent's dependency arrays.
    pub update_deps: bool,
    /// Do not take a backup. A failure after removal is then unrecoverable.
    pub skip_backup: bool,
}

/// What a successful delete did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub resource_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    /// Dependents found before deletion.
    pub dependents: Vec<ResourceDependency>,
    /// Agents whose definitions were rewritten.
    pub updated_agents: Vec<String>,
}

/// Delete a resource.
///
/// Steps:
/// 1. Check dependents and core status; core resources are never deleted
/// 2. Refuse if dependents exist and `force` is not set
/// 3. Back up the resource unless `skip_backup`
/// 4. Remove the file or directory
/// 5. With `update_deps`, rewrite every dependent agent
///
/// If step 4 or 5 fails and a backup was taken, the backup is restored and
/// the original error is returned.
///
/// # Errors
///
/// Returns `ConfigError::NoActiveCoreSystem` without an active core
/// system, `ResourceError::CoreResourceProtected`,
/// `ResourceError::DependenciesExist`, `ResourceError::NotFound`, or the
/// I/O error that interrupted the delete.
pub async fn safe_delete<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    reporter: &impl ProgressReporter,
    resource_type: ResourceType,
    resource_name: &str,
    options: DeleteOptions,
) -> Result<DeleteOutcome> {
    resolver.require_core_system()?;

    // Step 1: Check.
    reporter.step(&format!("checking dependents of {resource_type} '{resource_name}'..."));
    let check = check_dependencies(resolver, resource_name, resource_type).await?;
    if check.is_core {
        let path = resolver
            .resource_path(resource_type, resource_name)
            .await?
            .unwrap_or_default();
        return Err(ResourceError::CoreResourceProtected {
            name: resource_name.to_string(),
            path,
        }
        .into());
    }

    // Step 2: Gate.
    if check.has_active && !options.force {
        return Err(ResourceError::DependenciesExist {
            name: resource_name.to_string(),
            dependents: check.dependencies,
        }
        .into());
    }
    if check.has_active && !options.update_deps {
        reporter.warn(&format!(
            "{} dependent(s) will keep referencing '{resource_name}'",
            check.dependencies.len()
        ));
    }

    // Step 3: Backup. A failure here aborts before anything is touched.
    let backup_path = if options.skip_backup {
        reporter.warn("skipping backup; this delete cannot be undone");
        None
    } else {
        reporter.step("creating backup...");
        Some(create_backup(resolver, resource_name, resource_type, &check.dependencies).await?)
    };

    // Steps 4-5, with rollback.
    match mutate(resolver, reporter, resource_type, resource_name, &check, options).await {
        Ok((resource_path, updated_agents)) => {
            tracing::info!(resource = resource_name, resource_type = %resource_type, path = %resource_path.display(), "resource deleted");
            reporter.success(&format!("{resource_type} '{resource_name}' deleted"));
            Ok(DeleteOutcome {
                resource_path,
                backup_path,
                dependents: check.dependencies,
                updated_agents,
            })
        }
        Err(err) => {
            if let Some(backup) = &backup_path {
                reporter.warn("delete failed; restoring from backup...");
                if let Err(rollback_err) = restore_backup(resolver, backup).await {
                    tracing::error!(
                        backup = %backup.display(),
                        error = %format!("{rollback_err:#}"),
                        "rollback failed"
                    );
                }
            } else {
                tracing::error!(resource = resource_name, "delete failed with no backup to roll back to");
            }
            Err(err)
        }
    }
}

/// Steps 4 and 5: remove the resource, then rewrite dependent agents.
async fn mutate<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    reporter: &impl ProgressReporter,
    resource_type: ResourceType,
    resource_name: &str,
    check: &DependencyCheckResult,
    options: DeleteOptions,
) -> Result<(PathBuf, Vec<String>)> {
    let fs = resolver.fs();
    let path = resolver
        .resource_path(resource_type, resource_name)
        .await?
        .ok_or_else(|| ResourceError::not_found(resource_type, resource_name))?;

    reporter.step(&format!("removing {}...", path.display()));
    if fs.is_dir(&path).await {
        fs.remove_dir_all(&path).await?;
    } else {
        fs.remove_file(&path).await?;
    }

    let mut updated_agents = Vec::new();
    if options.update_deps {
        let target = dependency_name(&path, resource_name);
        for dependent in check.agent_dependents() {
            let mut agent = resolver.load_agent(&dependent.name).await?;
            if let Some(content) = remove_dependency(&agent.content, &target)? {
                reporter.step(&format!("updating agent '{}'...", agent.name));
                agent.content = content;
                resolver.save_agent(&agent).await?;
                updated_agents.push(agent.name);
            }
        }
    }
    Ok((path, updated_agents))
}

/// Restore a resource from a backup name or path.
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if the backup does not exist, or any
/// error from [`restore_backup`].
pub async fn restore<F: ResourceFs, R: CoreSystemRegistry>(
    resolver: &LayerResolver<'_, F, R>,
    reporter: &impl ProgressReporter,
    backup: &str,
) -> Result<BackupMetadata> {
    let backup_path = resolve_backup(resolver, backup).await?;
    reporter.step(&format!("restoring from {}...", backup_path.display()));
    let metadata = restore_backup(resolver, &backup_path).await?;
    reporter.success(&format!(
        "{} '{}' restored to {}",
        metadata.resource_type,
        metadata.resource_name,
        metadata.original_path.display()
    ));
    Ok(metadata)
}
