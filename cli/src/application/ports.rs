//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::domain::{CoreSystemConfig, LcagentsConfig};

// ── Core System Port ──────────────────────────────────────────────────────────

/// Read-only oracle for the active core system.
pub trait CoreSystemRegistry {
    /// Identifier of the active core system, if any.
    fn active_core_system(&self) -> Option<String>;
    /// Configuration of the active core system, if any.
    fn active_core_config(&self) -> Option<CoreSystemConfig>;
}

// ── Filesystem Port ───────────────────────────────────────────────────────────

/// One entry returned by [`ResourceFs::read_dir`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Abstracts the filesystem operations used on the `.lcagents` tree.
///
/// Every call is a suspension point; implementations must not cache.
#[allow(async_fn_in_trait)]
pub trait ResourceFs {
    /// Whether anything exists at `path`.
    async fn exists(&self, path: &Path) -> bool;
    /// Whether `path` is an existing directory.
    async fn is_dir(&self, path: &Path) -> bool;
    /// Read a UTF-8 file.
    async fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Read a file's raw bytes.
    async fn read(&self, path: &Path) -> Result<Vec<u8>>;
    /// Write a file, replacing any existing content.
    async fn write(&self, path: &Path, content: &[u8]) -> Result<()>;
    /// Create a directory and all missing parents.
    async fn create_dir_all(&self, path: &Path) -> Result<()>;
    /// Remove a single file.
    async fn remove_file(&self, path: &Path) -> Result<()>;
    /// Remove a directory tree.
    async fn remove_dir_all(&self, path: &Path) -> Result<()>;
    /// List a directory in the order the platform returns entries.
    async fn read_dir(&self, path: &Path) -> Result<Vec<DirEntryInfo>>;
    /// Copy a file or a directory tree to `to`, creating parents.
    async fn copy_recursive(&self, from: &Path, to: &Path) -> Result<()>;
    /// Move `from` to `to`.
    async fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait, no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts configuration persistence.
pub trait ConfigStore {
    /// Load the configuration, returning defaults if none exists.
    fn load(&self) -> Result<LcagentsConfig>;
    /// Persist the configuration.
    fn save(&self, config: &LcagentsConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
