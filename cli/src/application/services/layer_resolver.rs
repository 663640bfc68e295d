//! Application service: locate resources across the `custom → org → core`
//! layers.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! The resolver never copies or caches content; it hands out paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CoreSystemRegistry, ResourceFs};
use crate::domain::agent::resource_dependencies;
use crate::domain::error::{ConfigError, ResourceError};
use crate::domain::layer::{
    AGENT_EXTENSION, Layer, LayerLayout, OVERRIDES_DIR, ResourceType, candidate_file_names,
    resource_name_from_file, validate_resource_name,
};
use crate::domain::{
    AgentDefinition, AgentResolution, AgentResolutionPath, CoreSystemConfig, ResourceMetadata,
    ResourceWithSource,
};

/// Resolves resources against the layered tree described by a
/// [`LayerLayout`], using an injected filesystem and core-system oracle.
pub struct LayerResolver<'a, F, R> {
    fs: &'a F,
    registry: &'a R,
    layout: LayerLayout,
}

impl<'a, F: ResourceFs, R: CoreSystemRegistry> LayerResolver<'a, F, R> {
    #[must_use]
    pub fn new(fs: &'a F, registry: &'a R, layout: LayerLayout) -> Self {
        Self {
            fs,
            registry,
            layout,
        }
    }

    #[must_use]
    pub fn fs(&self) -> &'a F {
        self.fs
    }

    #[must_use]
    pub fn layout(&self) -> &LayerLayout {
        &self.layout
    }

    /// Identifier of the active core system, if any.
    #[must_use]
    pub fn active_core_system(&self) -> Option<String> {
        self.registry.active_core_system()
    }

    /// Active core system and its configuration, required by mutating
    /// operations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoActiveCoreSystem` if the oracle has neither.
    pub fn require_core_system(&self) -> Result<(String, CoreSystemConfig)> {
        let core = self
            .registry
            .active_core_system()
            .ok_or(ConfigError::NoActiveCoreSystem)?;
        let config = self
            .registry
            .active_core_config()
            .ok_or(ConfigError::NoActiveCoreSystem)?;
        Ok((core, config))
    }

    /// Whether `path` lies under the active core system's tree.
    #[must_use]
    pub fn is_core_path(&self, path: &Path) -> bool {
        self.active_core_system()
            .is_some_and(|core| self.layout.is_core_path(path, &core))
    }

    /// Resolve an agent's core definition and the layers overriding it.
    ///
    /// `core_system_override` takes the place of the active core system.
    /// Returns [`AgentResolution::Unconfigured`] when there is neither.
    pub async fn resolve_agent(
        &self,
        agent_id: &str,
        core_system_override: Option<&str>,
    ) -> AgentResolution {
        let Some(core_system) = core_system_override
            .filter(|core| !core.is_empty())
            .map(String::from)
            .or_else(|| self.active_core_system())
        else {
            tracing::debug!(agent_id, "no active core system; agent unresolved");
            return AgentResolution::Unconfigured;
        };

        let core_path = self.layout.core_agent_path(&core_system, agent_id);
        let mut final_path = core_path.clone();
        let mut layer_sources = vec![Layer::Core];
        for layer in [Layer::Org, Layer::Custom] {
            let override_path = self.layout.agent_override_path(layer, agent_id);
            if self.fs.exists(&override_path).await {
                layer_sources.push(layer);
                final_path = override_path;
            }
        }

        AgentResolution::Resolved(AgentResolutionPath {
            agent_id: agent_id.to_string(),
            core_system,
            core_path,
            final_path,
            layer_sources,
        })
    }

    /// Agent identifiers defined by the active core system.
    ///
    /// # Errors
    ///
    /// Returns an error if the agents directory exists but cannot be read.
    pub async fn list_agents(&self) -> Result<Vec<String>> {
        let Some(core) = self.active_core_system() else {
            return Ok(Vec::new());
        };
        let dir = self
            .layout
            .core_system_dir(&core)
            .join(ResourceType::Agents.dir_name());
        if !self.fs.is_dir(&dir).await {
            return Ok(Vec::new());
        }
        let suffix = format!(".{AGENT_EXTENSION}");
        Ok(self
            .fs
            .read_dir(&dir)
            .await?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .filter_map(|entry| {
                entry
                    .name
                    .strip_suffix(&suffix)
                    .filter(|id| !id.is_empty())
                    .map(String::from)
            })
            .collect())
    }

    /// Every resource of `ty` in core, then org, then custom. Names present
    /// in several layers appear once per layer. Entries whose name would be
    /// rejected by a lookup are left out, so every listed name resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing layer directory cannot be read.
    pub async fn list_resources(&self, ty: ResourceType) -> Result<Vec<ResourceWithSource>> {
        let core = self.active_core_system();
        let mut resources = Vec::new();
        for layer in Layer::ENUMERATION {
            let Some(dir) = self.layout.type_dir(layer, core.as_deref(), ty) else {
                continue;
            };
            if !self.fs.is_dir(&dir).await {
                continue;
            }
            for entry in self.fs.read_dir(&dir).await? {
                if entry.name.starts_with('.') || is_overrides_dir(layer, &entry.name) {
                    continue;
                }
                let name = resource_name_from_file(&entry.name);
                if validate_resource_name(&name).is_err() {
                    tracing::debug!(path = %entry.path.display(), "skipping entry whose name cannot be looked up");
                    continue;
                }
                resources.push(ResourceWithSource {
                    name,
                    path: entry.path,
                    source: layer,
                });
            }
        }
        Ok(resources)
    }

    async fn find_in_layer(
        &self,
        layer: Layer,
        core: Option<&str>,
        ty: ResourceType,
        name: &str,
    ) -> Option<PathBuf> {
        if is_overrides_dir(layer, name) {
            return None;
        }
        let dir = self.layout.type_dir(layer, core, ty)?;
        for candidate in candidate_file_names(name) {
            let path = dir.join(candidate);
            if self.fs.exists(&path).await {
                return Some(path);
            }
        }
        None
    }

    /// Find `name` using `custom → org → core` precedence.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` for malformed names.
    pub async fn locate(
        &self,
        ty: ResourceType,
        name: &str,
    ) -> Result<Option<ResourceWithSource>> {
        validate_resource_name(name)?;
        let core = self.active_core_system();
        for layer in Layer::PRECEDENCE {
            if let Some(path) = self.find_in_layer(layer, core.as_deref(), ty, name).await {
                tracing::debug!(resource_type = %ty, name, %layer, path = %path.display(), "resource resolved");
                return Ok(Some(ResourceWithSource {
                    name: name.to_string(),
                    path,
                    source: layer,
                }));
            }
        }
        Ok(None)
    }

    /// Effective path of a resource under full layer precedence.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` for malformed names.
    pub async fn resource_path(&self, ty: ResourceType, name: &str) -> Result<Option<PathBuf>> {
        Ok(self.locate(ty, name).await?.map(|found| found.path))
    }

    /// Path of a resource in the core layer only, ignoring overrides.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` for malformed names.
    pub async fn core_resource_path(
        &self,
        ty: ResourceType,
        name: &str,
    ) -> Result<Option<PathBuf>> {
        validate_resource_name(name)?;
        let core = self.active_core_system();
        Ok(self
            .find_in_layer(Layer::Core, core.as_deref(), ty, name)
            .await)
    }

    /// Resolve a template, most specific layer first.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if no layer has the template.
    pub async fn resolve_template(&self, name: &str) -> Result<ResourceWithSource> {
        self.locate(ResourceType::Templates, name)
            .await?
            .ok_or_else(|| ResourceError::not_found(ResourceType::Templates, name).into())
    }

    /// Read the effective copy of a resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the resource does not resolve, or
    /// an I/O error if it cannot be read.
    pub async fn read_resource(&self, ty: ResourceType, name: &str) -> Result<String> {
        let path = self
            .resource_path(ty, name)
            .await?
            .ok_or_else(|| ResourceError::not_found(ty, name))?;
        self.fs.read_to_string(&path).await
    }

    /// Declared dependencies of the effective copy of a resource.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if the resource does not resolve, or
    /// an error if its YAML cannot be read or parsed.
    pub async fn resource_metadata(&self, ty: ResourceType, name: &str) -> Result<ResourceMetadata> {
        let found = self
            .locate(ty, name)
            .await?
            .ok_or_else(|| ResourceError::not_found(ty, name))?;
        self.metadata_at(&found).await
    }

    /// Declared dependencies of one specific listed entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or its YAML parsed.
    pub async fn metadata_at(&self, resource: &ResourceWithSource) -> Result<ResourceMetadata> {
        let dependencies = if self.fs.is_dir(&resource.path).await {
            Vec::new()
        } else {
            let content = self.fs.read_to_string(&resource.path).await?;
            let whole_document = resource
                .path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            resource_dependencies(&content, whole_document)
                .with_context(|| format!("reading dependencies of {}", resource.path.display()))?
        };
        Ok(ResourceMetadata {
            name: resource.name.clone(),
            path: resource.path.clone(),
            source: resource.source,
            dependencies,
        })
    }

    /// Load an agent definition from the active core system.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` if there is no active core system or
    /// the core definition file does not exist.
    pub async fn load_agent(&self, name: &str) -> Result<AgentDefinition> {
        validate_resource_name(name)?;
        let AgentResolution::Resolved(path) = self.resolve_agent(name, None).await else {
            return Err(ResourceError::agent_not_found(name).into());
        };
        if !self.fs.exists(&path.core_path).await {
            return Err(ResourceError::agent_not_found(name).into());
        }
        let content = self.fs.read_to_string(&path.core_path).await?;
        Ok(AgentDefinition {
            name: name.to_string(),
            content,
            path: Some(path),
        })
    }

    /// Write an agent definition back to its core path.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::InvalidArgument` if the record carries no
    /// path information, or an I/O error if the write fails.
    pub async fn save_agent(&self, agent: &AgentDefinition) -> Result<()> {
        let core_path = agent
            .path
            .as_ref()
            .filter(|path| !path.is_unresolved() && !path.core_path.as_os_str().is_empty())
            .map(|path| &path.core_path)
            .ok_or_else(|| {
                ResourceError::InvalidArgument(format!(
                    "agent '{}' has no path information",
                    agent.name
                ))
            })?;
        if let Some(parent) = core_path.parent() {
            self.fs.create_dir_all(parent).await?;
        }
        self.fs.write(core_path, agent.content.as_bytes()).await?;
        tracing::debug!(agent = %agent.name, path = %core_path.display(), "agent definition saved");
        Ok(())
    }
}

/// The `overrides/` folder of org and custom type directories holds
/// override files, not resources.
fn is_overrides_dir(layer: Layer, name: &str) -> bool {
    layer != Layer::Core && name == OVERRIDES_DIR
}
