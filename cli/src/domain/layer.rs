//! Layer and resource-type tags plus pure path construction for the
//! `.lcagents/` tree.
//!
//! Nothing in here touches the filesystem. `LayerLayout` only joins paths;
//! existence checks belong to the application layer.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ResourceError;

/// Default project-local directory holding the layered tree.
pub const LCAGENTS_DIR: &str = ".lcagents";

/// Extension of agent definition files in the `agents` directory.
pub const AGENT_EXTENSION: &str = "md";

/// Extension of per-layer agent override files.
pub const OVERRIDE_EXTENSION: &str = "yaml";

/// Subdirectory of an org/custom type directory that holds overrides.
pub const OVERRIDES_DIR: &str = "overrides";

/// Extensions tried, in order, when a resource name has no exact match.
pub const RESOURCE_EXTENSIONS: &[&str] = &["md", "yaml", "yml", "txt", "json"];

static RESOURCE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern and cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^./\\\p{Cc}][^/\\\p{Cc}]{0,254}$").expect("valid regex")
});

// ── ResourceType ──────────────────────────────────────────────────────────────

/// Kind of resource; selects the subdirectory searched inside each layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Agents,
    Checklists,
    Templates,
    Data,
    Tasks,
    Workflows,
    Utils,
}

impl ResourceType {
    /// Every resource type, in scaffolding order.
    pub const ALL: [Self; 7] = [
        Self::Agents,
        Self::Checklists,
        Self::Templates,
        Self::Data,
        Self::Tasks,
        Self::Workflows,
        Self::Utils,
    ];

    /// Directory name of this type inside a layer.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Agents => "agents",
            Self::Checklists => "checklists",
            Self::Templates => "templates",
            Self::Data => "data",
            Self::Tasks => "tasks",
            Self::Workflows => "workflows",
            Self::Utils => "utils",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for ResourceType {
    type Err = ResourceError;

    /// Accepts the plural directory name or its singular form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|ty| {
                let plural = ty.dir_name();
                lower == plural || plural.strip_suffix('s') == Some(lower.as_str())
            })
            .ok_or_else(|| {
                ResourceError::InvalidArgument(format!(
                    "unknown resource type '{s}' (expected one of: {})",
                    Self::ALL.map(Self::dir_name).join(", ")
                ))
            })
    }
}

// ── Layer ─────────────────────────────────────────────────────────────────────

/// Precedence tier a resource is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    Core,
    Org,
    Custom,
}

impl Layer {
    /// Resolution order: the most specific layer wins.
    pub const PRECEDENCE: [Self; 3] = [Self::Custom, Self::Org, Self::Core];

    /// Enumeration / provenance order.
    pub const ENUMERATION: [Self; 3] = [Self::Core, Self::Org, Self::Custom];

    /// Directory name of this layer under the lcagents root.
    #[must_use]
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Org => "org",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

// ── Names ─────────────────────────────────────────────────────────────────────

/// Validates a resource, agent, or core-system name before it is joined
/// onto a layer path.
///
/// # Errors
///
/// Returns `ResourceError::InvalidArgument` for empty names, names with path
/// separators, or names containing `..`.
pub fn validate_resource_name(name: &str) -> Result<()> {
    if !RESOURCE_NAME_RE.is_match(name) || name.contains("..") {
        return Err(ResourceError::InvalidArgument(format!(
            "invalid name '{name}': names must not be empty, start with '.', or contain path separators, control characters or '..'"
        ))
        .into());
    }
    Ok(())
}

/// File names that satisfy a lookup of `name`: the exact name first, then
/// `name` with each known extension appended.
#[must_use]
pub fn candidate_file_names(name: &str) -> Vec<String> {
    std::iter::once(name.to_string())
        .chain(RESOURCE_EXTENSIONS.iter().map(|ext| format!("{name}.{ext}")))
        .collect()
}

/// Resource name of a directory entry: known extensions are stripped,
/// anything else is kept verbatim.
#[must_use]
pub fn resource_name_from_file(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && RESOURCE_EXTENSIONS.contains(&ext) => {
            stem.to_string()
        }
        _ => file_name.to_string(),
    }
}

/// Name that dependency arrays use for the resource stored at `path`: the
/// entry's file name without a known extension. Falls back to `requested`
/// when the path has no file name.
#[must_use]
pub fn dependency_name(path: &Path, requested: &str) -> String {
    path.file_name().map_or_else(
        || resource_name_from_file(requested),
        |name| resource_name_from_file(&name.to_string_lossy()),
    )
}

// ── LayerLayout ───────────────────────────────────────────────────────────────

/// Path construction for the layered tree rooted at `.lcagents/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerLayout {
    root: PathBuf,
    backups: PathBuf,
}

impl LayerLayout {
    /// Layout rooted at `root`, with backups under `root/backups`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let backups = root.join("backups");
        Self { root, backups }
    }

    /// Override the backup directory. Relative paths are taken from the root.
    #[must_use]
    pub fn with_backups_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.backups = self.root.join(dir);
        self
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.root.join("config.yaml")
    }

    #[must_use]
    pub fn backups_dir(&self) -> &Path {
        &self.backups
    }

    #[must_use]
    pub fn virtual_dir(&self) -> PathBuf {
        self.root.join("virtual")
    }

    /// Pre-layering location of a resource type (`.lcagents/<type>`).
    #[must_use]
    pub fn flat_type_dir(&self, ty: ResourceType) -> PathBuf {
        self.root.join(ty.dir_name())
    }

    /// The namespaced core tree, `core/.<core_system>`.
    #[must_use]
    pub fn core_system_dir(&self, core_system: &str) -> PathBuf {
        self.root
            .join(Layer::Core.dir_name())
            .join(format!(".{core_system}"))
    }

    /// Directory of `layer`. The core layer needs an active core system.
    #[must_use]
    pub fn layer_dir(&self, layer: Layer, core_system: Option<&str>) -> Option<PathBuf> {
        match layer {
            Layer::Core => core_system.map(|core| self.core_system_dir(core)),
            Layer::Org | Layer::Custom => Some(self.root.join(layer.dir_name())),
        }
    }

    /// Directory holding resources of `ty` in `layer`.
    #[must_use]
    pub fn type_dir(
        &self,
        layer: Layer,
        core_system: Option<&str>,
        ty: ResourceType,
    ) -> Option<PathBuf> {
        self.layer_dir(layer, core_system)
            .map(|dir| dir.join(ty.dir_name()))
    }

    /// `<layer>/<type>/overrides`. Only meaningful for org and custom.
    #[must_use]
    pub fn overrides_dir(&self, layer: Layer, ty: ResourceType) -> PathBuf {
        self.root
            .join(layer.dir_name())
            .join(ty.dir_name())
            .join(OVERRIDES_DIR)
    }

    /// Override file for an agent in the org or custom layer.
    #[must_use]
    pub fn agent_override_path(&self, layer: Layer, agent_id: &str) -> PathBuf {
        self.overrides_dir(layer, ResourceType::Agents)
            .join(format!("{agent_id}.{OVERRIDE_EXTENSION}"))
    }

    /// Agent definition path inside a core system.
    #[must_use]
    pub fn core_agent_path(&self, core_system: &str, agent_id: &str) -> PathBuf {
        self.core_system_dir(core_system)
            .join(ResourceType::Agents.dir_name())
            .join(format!("{agent_id}.{AGENT_EXTENSION}"))
    }

    /// Whether `path` lies under the tree of `core_system`.
    #[must_use]
    pub fn is_core_path(&self, path: &Path, core_system: &str) -> bool {
        path.starts_with(self.core_system_dir(core_system))
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
