//! Output formatting module

pub mod human;
pub mod json;
pub mod reporter;
pub mod styles;

use std::path::Path;

use anyhow::Result;
use console::Term;
use owo_colors::OwoColorize as _;

pub use human::HumanRenderer;
pub use json::JsonRenderer;
pub use styles::Styles;

use crate::application::services::layer_structure::MigrationReport;
use crate::application::services::safe_delete::DeleteOutcome;
use crate::domain::layer::ResourceType;
use crate::domain::{
    AgentResolutionPath, BackupMetadata, BackupSummary, DependencyCheckResult, LcagentsConfig,
    ResourceWithSource,
};

/// Output context carrying styling and terminal state.
pub struct OutputContext {
    /// Stylesheet for colored output.
    pub styles: Styles,
    /// Whether stdout is a TTY.
    pub is_tty: bool,
    /// Whether to suppress non-error output.
    pub quiet: bool,
}

impl OutputContext {
    /// Create output context based on CLI flags and environment.
    #[must_use]
    pub fn new(no_color: bool, quiet: bool) -> Self {
        let is_tty = Term::stdout().is_term();
        let use_colors = !no_color && is_tty && std::env::var("NO_COLOR").is_err();

        let mut styles = Styles::default();
        if use_colors {
            styles.colorize();
        }

        Self {
            styles,
            is_tty,
            quiet,
        }
    }

    /// Print a success message prefixed with `✓`. Suppressed when `quiet`.
    pub fn success(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "✓".style(self.styles.success));
        }
    }

    /// Print a warning message prefixed with `⚠`. Suppressed when `quiet`.
    pub fn warn(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "⚠".style(self.styles.warning));
        }
    }

    /// Print an error message prefixed with `✗` to stderr. Never suppressed.
    pub fn error(&self, msg: &str) {
        eprintln!("  {} {msg}", "✗".style(self.styles.error));
    }

    /// Print an info message prefixed with `ℹ`. Suppressed when `quiet`.
    pub fn info(&self, msg: &str) {
        if !self.quiet {
            println!("  {} {msg}", "ℹ".style(self.styles.info));
        }
    }

    /// Print a section header. Suppressed when `quiet`.
    pub fn header(&self, msg: &str) {
        if !self.quiet {
            println!("  {}", msg.style(self.styles.header));
        }
    }

    /// Print a key-value pair with the key dimmed. Suppressed when `quiet`.
    pub fn kv(&self, key: &str, value: &str) {
        if !self.quiet {
            println!("  {}  {value}", key.style(self.styles.dim));
        }
    }
}

/// Dispatches rendering to the human or JSON renderer.
pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(JsonRenderer),
}

impl Renderer<'_> {
    /// Render the resources of one type across all layers.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_resources(
        &self,
        resource_type: ResourceType,
        resources: &[ResourceWithSource],
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_resources(resource_type, resources);
                Ok(())
            }
            Self::Json(r) => r.render_resources(resource_type, resources),
        }
    }

    /// Render the layers contributing to an agent.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_agent_resolution(&self, resolution: &AgentResolutionPath) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_agent_resolution(resolution);
                Ok(())
            }
            Self::Json(r) => r.render_agent_resolution(resolution),
        }
    }

    /// Render the effective copy of a single resource.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_resolved(&self, resource: &ResourceWithSource) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_resolved(resource);
                Ok(())
            }
            Self::Json(r) => r.render_resolved(resource),
        }
    }

    /// Render the dependents of a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_dependency_check(
        &self,
        resource_type: ResourceType,
        name: &str,
        result: &DependencyCheckResult,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_dependency_check(resource_type, name, result);
                Ok(())
            }
            Self::Json(r) => r.render_dependency_check(result),
        }
    }

    /// Render the result of a delete.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_delete(&self, outcome: &DeleteOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_delete(outcome);
                Ok(())
            }
            Self::Json(r) => r.render_delete(outcome),
        }
    }

    /// Render the result of a restore.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_restore(&self, metadata: &BackupMetadata) -> Result<()> {
        match self {
            // The reporter already printed the restore line.
            Self::Human(_) => Ok(()),
            Self::Json(r) => r.render_restore(metadata),
        }
    }

    /// Render the available backups.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_backups(&self, backups: &[BackupSummary]) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_backups(backups);
                Ok(())
            }
            Self::Json(r) => r.render_backups(backups),
        }
    }

    /// Render the result of a flat-to-layered migration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_migration(
        &self,
        core_system: &str,
        report: &MigrationReport,
        virtual_dir: &Path,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_migration(core_system, report, virtual_dir);
                Ok(())
            }
            Self::Json(r) => r.render_migration(core_system, report, virtual_dir),
        }
    }

    /// Render the current configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(&self, config: &LcagentsConfig, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config(config, path);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }

    /// Render a successful `config set`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_set(
        &self,
        key: &str,
        value: &str,
        config: &LcagentsConfig,
        path: &Path,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_config_set(key, value);
                Ok(())
            }
            Self::Json(r) => r.render_config(config, path),
        }
    }
}
