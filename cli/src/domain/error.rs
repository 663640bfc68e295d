//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. Callers branch on a kind with
//! `err.downcast_ref::<ResourceError>()`.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::layer::ResourceType;
use crate::domain::resource::ResourceDependency;

// ── Resource errors ───────────────────────────────────────────────────────────

/// Errors raised while resolving or mutating layered resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Cannot delete core resource '{name}' ({path}). Core resources are immutable.")]
    CoreResourceProtected { name: String, path: PathBuf },

    #[error(
        "Cannot delete '{name}': {} active dependent(s): {}. Use --force to delete anyway or --update-deps to remove references.",
        dependents.len(),
        describe_dependents(dependents)
    )]
    DependenciesExist {
        name: String,
        dependents: Vec<ResourceDependency>,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid backup at {path}: {reason}")]
    InvalidBackup { path: PathBuf, reason: String },

    #[error("Cannot restore to {path}: parent directory no longer exists.")]
    StaleLocation { path: PathBuf },
}

impl ResourceError {
    /// A resource of `resource_type` that no layer supplies.
    #[must_use]
    pub fn not_found(resource_type: ResourceType, name: &str) -> Self {
        Self::NotFound(format!("{resource_type} '{name}' (checked custom, org and core layers)"))
    }

    /// An agent definition missing from the active core system.
    #[must_use]
    pub fn agent_not_found(name: &str) -> Self {
        Self::NotFound(format!("Agent '{name}' in the active core system"))
    }

    /// A backup directory that does not exist.
    #[must_use]
    pub fn backup_not_found(reference: &str) -> Self {
        Self::NotFound(format!("Backup '{reference}'"))
    }

    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::CoreResourceProtected { .. } => "CORE_RESOURCE_PROTECTED",
            Self::DependenciesExist { .. } => "DEPENDENCIES_EXIST",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::InvalidBackup { .. } => "INVALID_BACKUP",
            Self::StaleLocation { .. } => "STALE_LOCATION",
        }
    }
}

/// `agent 'dev', resource 'notes-tmpl'`.
fn describe_dependents(dependents: &[ResourceDependency]) -> String {
    dependents
        .iter()
        .map(|dep| format!("{} '{}'", dep.kind, dep.name))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nReason: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("No active core system. Set one with: lcagents config set core-system <name>")]
    NoActiveCoreSystem,
}

impl ConfigError {
    /// Stable machine-readable code used by `--json` error output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownKey { .. } | Self::InvalidValue { .. } => "INVALID_CONFIG",
            Self::NoActiveCoreSystem => "NO_ACTIVE_CORE_SYSTEM",
        }
    }
}

/// Machine-readable code for any error, found by walking its cause chain.
/// Errors without a domain kind map to `"ERROR"`.
#[must_use]
pub fn error_code(err: &anyhow::Error) -> &'static str {
    err.chain()
        .find_map(|cause| {
            cause
                .downcast_ref::<ResourceError>()
                .map(ResourceError::code)
                .or_else(|| cause.downcast_ref::<ConfigError>().map(ConfigError::code))
        })
        .unwrap_or("ERROR")
}
