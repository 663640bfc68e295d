//! Application service: idempotent scaffolding of the layered tree.
//!
//! Every operation here only creates or moves directories and may be run
//! any number of times.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{CoreSystemRegistry, ResourceFs};
use crate::application::services::layer_resolver::LayerResolver;
use crate::domain::layer::{Layer, ResourceType, validate_resource_name};

/// What `migrate_from_flat_structure` did per resource type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Flat directories moved into the core tree.
    pub moved: Vec<ResourceType>,
    /// Types that had no flat directory and got an empty one.
    pub created: Vec<ResourceType>,
}

impl<F: ResourceFs, R: CoreSystemRegistry> LayerResolver<'_, F, R> {
    /// Create `core/`, the org and custom type directories (with
    /// `agents/overrides`), `virtual/`, and the backup directory.
    ///
    /// # Errors
    ///
    /// Returns an error if any directory cannot be created.
    pub async fn create_layered_structure(&self) -> Result<()> {
        let layout = self.layout();
        let fs = self.fs();
        fs.create_dir_all(&layout.root().join(Layer::Core.dir_name()))
            .await?;
        for layer in [Layer::Org, Layer::Custom] {
            for ty in ResourceType::ALL {
                if let Some(dir) = layout.type_dir(layer, None, ty) {
                    fs.create_dir_all(&dir).await?;
                }
            }
            fs.create_dir_all(&layout.overrides_dir(layer, ResourceType::Agents))
                .await?;
        }
        for ty in ResourceType::ALL {
            fs.create_dir_all(&layout.virtual_dir().join(ty.dir_name()))
                .await?;
        }
        fs.create_dir_all(layout.backups_dir()).await?;
        tracing::debug!(root = %layout.root().display(), "layered structure ensured");
        Ok(())
    }

    /// Move pre-layering `.lcagents/<type>/` directories into
    /// `core/.<core_system>/<type>/`, replacing whatever is already there,
    /// then create empty directories for the remaining types.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` for a malformed core system
    /// name, or an I/O error if a move fails.
    pub async fn migrate_from_flat_structure(&self, core_system: &str) -> Result<MigrationReport> {
        validate_resource_name(core_system)?;
        let layout = self.layout();
        let fs = self.fs();
        let core_dir = layout.core_system_dir(core_system);
        fs.create_dir_all(&core_dir).await?;

        let mut report = MigrationReport::default();
        for ty in ResourceType::ALL {
            let flat = layout.flat_type_dir(ty);
            let target = core_dir.join(ty.dir_name());
            if fs.is_dir(&flat).await {
                if fs.exists(&target).await {
                    tracing::warn!(target = %target.display(), "replacing existing core directory during migration");
                    fs.remove_dir_all(&target).await?;
                }
                fs.rename(&flat, &target)
                    .await
                    .with_context(|| format!("migrating {} into {}", flat.display(), core_dir.display()))?;
                report.moved.push(ty);
            } else {
                fs.create_dir_all(&target).await?;
                report.created.push(ty);
            }
        }
        tracing::info!(core_system, moved = report.moved.len(), created = report.created.len(), "flat structure migrated");
        Ok(report)
    }

    /// Ensure the core system's type directories and the `virtual/` view
    /// directories exist. Returns the virtual root.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` for a malformed core system
    /// name, or an I/O error if a directory cannot be created.
    pub async fn create_virtual_resolution_system(&self, core_system: &str) -> Result<PathBuf> {
        validate_resource_name(core_system)?;
        let layout = self.layout();
        let fs = self.fs();
        let virtual_root = layout.virtual_dir();
        for ty in ResourceType::ALL {
            fs.create_dir_all(&layout.core_system_dir(core_system).join(ty.dir_name()))
                .await?;
            fs.create_dir_all(&virtual_root.join(ty.dir_name())).await?;
        }
        tracing::debug!(core_system, root = %virtual_root.display(), "virtual resolution system ensured");
        Ok(virtual_root)
    }
}
