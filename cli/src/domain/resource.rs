//! Resolved-resource value types: listing entries, agent resolution paths,
//! dependency records.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::layer::Layer;

/// A resource found while listing, tagged with the layer that holds it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceWithSource {
    pub name: String,
    pub path: PathBuf,
    pub source: Layer,
}

/// Resolved location of an agent and the layers that contribute to it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResolutionPath {
    pub agent_id: String,
    pub core_system: String,
    pub core_path: PathBuf,
    /// Path of the highest-precedence contributing layer.
    pub final_path: PathBuf,
    /// `core` first, then `org` / `custom` when an override file exists.
    pub layer_sources: Vec<Layer>,
}

impl AgentResolutionPath {
    /// Flat "nothing to resolve" sentinel: empty strings, no layers.
    #[must_use]
    pub fn unresolved() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.core_system.is_empty()
    }
}

/// Outcome of resolving an agent. `Unconfigured` is an expected state, not
/// an error: there is no active core system to resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentResolution {
    Resolved(AgentResolutionPath),
    Unconfigured,
}

impl AgentResolution {
    /// Collapse into the flat shape, using the sentinel for `Unconfigured`.
    #[must_use]
    pub fn into_path(self) -> AgentResolutionPath {
        match self {
            Self::Resolved(path) => path,
            Self::Unconfigured => AgentResolutionPath::unresolved(),
        }
    }
}

/// An agent definition loaded from the core layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentDefinition {
    pub name: String,
    pub content: String,
    /// Where the definition came from; `save_agent` writes back to
    /// `path.core_path`.
    pub path: Option<AgentResolutionPath>,
}

/// Whether a dependent is an agent or a sibling resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    Agent,
    Resource,
}

impl std::fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Agent => write!(f, "agent"),
            Self::Resource => write!(f, "resource"),
        }
    }
}

/// One entity that references a target resource by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDependency {
    #[serde(rename = "type")]
    pub kind: DependencyKind,
    pub name: String,
    pub path: PathBuf,
}

/// Result of scanning for dependents of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyCheckResult {
    pub has_active: bool,
    /// Agent dependents first, then resource dependents, in listing order.
    pub dependencies: Vec<ResourceDependency>,
    pub is_core: bool,
    /// Agents or resources that could not be read during the scan.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl DependencyCheckResult {
    #[must_use]
    pub fn new(dependencies: Vec<ResourceDependency>, is_core: bool) -> Self {
        Self {
            has_active: !dependencies.is_empty(),
            dependencies,
            is_core,
            skipped: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_skipped(mut self, skipped: Vec<String>) -> Self {
        self.skipped = skipped;
        self
    }

    /// Agent dependents in scan order.
    pub fn agent_dependents(&self) -> impl Iterator<Item = &ResourceDependency> {
        self.dependencies
            .iter()
            .filter(|dep| dep.kind == DependencyKind::Agent)
    }
}

/// Declared dependencies of a non-agent resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceMetadata {
    pub name: String,
    pub path: PathBuf,
    pub source: Layer,
    pub dependencies: Vec<String>,
}
