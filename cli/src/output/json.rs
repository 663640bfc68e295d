//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed document to
//! stdout. Failures use the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::services::layer_structure::MigrationReport;
use crate::application::services::safe_delete::DeleteOutcome;
use crate::domain::error::{ResourceError, error_code};
use crate::domain::layer::ResourceType;
use crate::domain::{
    AgentResolutionPath, BackupMetadata, BackupSummary, DependencyCheckResult, LcagentsConfig,
    ResourceWithSource,
};

/// Format a command failure as a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// `DEPENDENCIES_EXIST` errors also carry a `dependents` array with the
/// `type`, `name` and `path` of everything still referencing the resource.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(err: &anyhow::Error) -> Result<String> {
    let mut obj = serde_json::json!({
        "error": true,
        "message": format!("{err:#}"),
        "code": error_code(err),
    });
    let blocking = err.chain().find_map(|cause| match cause.downcast_ref::<ResourceError>() {
        Some(ResourceError::DependenciesExist { dependents, .. }) => Some(dependents),
        _ => None,
    });
    if let Some(dependents) = blocking {
        obj["dependents"] = serde_json::to_value(dependents).context("JSON serialization failed")?;
    }
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}

/// Renders domain types as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    pub(crate) fn render_resources(
        &self,
        resource_type: ResourceType,
        resources: &[ResourceWithSource],
    ) -> Result<()> {
        print_json(&serde_json::json!({
            "type": resource_type,
            "resources": resources,
        }))
    }

    pub(crate) fn render_agent_resolution(&self, resolution: &AgentResolutionPath) -> Result<()> {
        print_json(resolution)
    }

    pub(crate) fn render_resolved(&self, resource: &ResourceWithSource) -> Result<()> {
        print_json(resource)
    }

    pub(crate) fn render_dependency_check(&self, result: &DependencyCheckResult) -> Result<()> {
        print_json(result)
    }

    pub(crate) fn render_delete(&self, outcome: &DeleteOutcome) -> Result<()> {
        print_json(outcome)
    }

    pub(crate) fn render_restore(&self, metadata: &BackupMetadata) -> Result<()> {
        print_json(metadata)
    }

    pub(crate) fn render_backups(&self, backups: &[BackupSummary]) -> Result<()> {
        print_json(&backups)
    }

    pub(crate) fn render_migration(
        &self,
        core_system: &str,
        report: &MigrationReport,
        virtual_dir: &Path,
    ) -> Result<()> {
        print_json(&serde_json::json!({
            "coreSystem": core_system,
            "moved": report.moved,
            "created": report.created,
            "virtualDir": virtual_dir,
        }))
    }

    pub(crate) fn render_config(&self, config: &LcagentsConfig, path: &Path) -> Result<()> {
        print_json(&serde_json::json!({
            "path": path,
            "config": config,
        }))
    }
}
