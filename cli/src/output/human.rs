//! Human-readable terminal renderer.

use std::path::Path;

use owo_colors::OwoColorize as _;

use crate::application::services::layer_structure::MigrationReport;
use crate::application::services::safe_delete::DeleteOutcome;
use crate::domain::layer::ResourceType;
use crate::domain::{
    AgentResolutionPath, BackupSummary, DependencyCheckResult, LcagentsConfig, ResourceWithSource,
};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the resources of one type, one line per layer entry.
    pub fn render_resources(&self, resource_type: ResourceType, resources: &[ResourceWithSource]) {
        if self.ctx.quiet {
            return;
        }
        if resources.is_empty() {
            println!("No {resource_type} found.");
            return;
        }
        println!("{}:\n", capitalize(resource_type.dir_name()));
        for resource in resources {
            let label = format!("[{}]", resource.source);
            println!(
                "  {:<32} {:<9} {}",
                resource.name,
                label.style(self.ctx.styles.layer(resource.source)),
                resource.path.display().style(self.ctx.styles.dim)
            );
        }
    }

    /// Render the layers contributing to an agent.
    pub fn render_agent_resolution(&self, resolution: &AgentResolutionPath) {
        if resolution.is_unresolved() {
            self.ctx
                .warn("No active core system. Set one: lcagents config set core-system <id>");
            return;
        }
        self.ctx.kv("Agent:", &resolution.agent_id);
        self.ctx.kv("Core system:", &resolution.core_system);
        self.ctx
            .kv("Core path:", &resolution.core_path.display().to_string());
        self.ctx
            .kv("Final path:", &resolution.final_path.display().to_string());
        let layers: Vec<String> = resolution
            .layer_sources
            .iter()
            .map(ToString::to_string)
            .collect();
        self.ctx.kv("Layers:", &layers.join(" → "));
    }

    /// Render where a single resource resolved.
    pub fn render_resolved(&self, resource: &ResourceWithSource) {
        self.ctx.kv("Name:", &resource.name);
        self.ctx.kv("Layer:", &resource.source.to_string());
        self.ctx.kv("Path:", &resource.path.display().to_string());
    }

    /// Render the dependents of a resource.
    pub fn render_dependency_check(
        &self,
        resource_type: ResourceType,
        name: &str,
        result: &DependencyCheckResult,
    ) {
        if result.is_core {
            self.ctx.warn(&format!(
                "{resource_type} '{name}' is a core resource and cannot be deleted"
            ));
        }
        if result.has_active {
            self.ctx.header(&format!(
                "{} dependent(s) of '{name}':",
                result.dependencies.len()
            ));
            for dep in &result.dependencies {
                self.ctx.kv(
                    &format!("{:<9}", dep.kind),
                    &format!("{}  {}", dep.name, dep.path.display()),
                );
            }
        } else {
            self.ctx
                .success(&format!("No dependents reference {resource_type} '{name}'"));
        }
        for skipped in &result.skipped {
            self.ctx.warn(&format!("could not scan {skipped}"));
        }
    }

    /// Render the result of a delete.
    pub fn render_delete(&self, outcome: &DeleteOutcome) {
        if let Some(backup) = &outcome.backup_path {
            self.ctx.kv("Backup:", &backup.display().to_string());
            if let Some(name) = backup.file_name() {
                self.ctx.info(&format!(
                    "Undo with: lcagents restore {}",
                    name.to_string_lossy()
                ));
            }
        }
        for agent in &outcome.updated_agents {
            self.ctx.success(&format!("Removed reference from agent '{agent}'"));
        }
    }

    /// Render the available backups, newest first.
    pub fn render_backups(&self, backups: &[BackupSummary]) {
        if self.ctx.quiet {
            return;
        }
        if backups.is_empty() {
            println!("No backups found.");
            return;
        }
        println!("Backups:\n");
        for backup in backups {
            println!(
                "  {:<48} {:<10} {}",
                backup.name,
                backup.metadata.resource_type,
                backup
                    .metadata
                    .original_path
                    .display()
                    .style(self.ctx.styles.dim)
            );
        }
        println!("\nRestore one: lcagents restore <backup>");
    }

    /// Render the result of a flat-to-layered migration.
    pub fn render_migration(&self, core_system: &str, report: &MigrationReport, virtual_dir: &Path) {
        for ty in &report.moved {
            self.ctx.success(&format!("Moved {ty} into core/.{core_system}"));
        }
        for ty in &report.created {
            self.ctx.info(&format!("Created empty {ty} in core/.{core_system}"));
        }
        self.ctx
            .kv("Virtual tree:", &virtual_dir.display().to_string());
    }

    /// Confirm a `config set`.
    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("Set {key} = {value}"));
    }

    /// Render the current configuration.
    pub fn render_config(&self, config: &LcagentsConfig, path: &Path) {
        if self.ctx.quiet {
            return;
        }
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        println!(
            "  {:<20} {}",
            "core-system:",
            config.core_system.as_deref().unwrap_or("(not set)")
        );
        println!(
            "  {:<20} {}",
            "backups.dir:",
            config.backups.dir.as_deref().unwrap_or("backups")
        );
        if !config.core_systems.is_empty() {
            println!();
            println!("  {}", "Core systems:".style(self.ctx.styles.bold));
            for (id, core) in &config.core_systems {
                println!(
                    "    {:<18} {:<10} {}",
                    id,
                    core.version.as_deref().unwrap_or("-"),
                    core.description.as_deref().unwrap_or("")
                );
            }
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in ["LCAGENTS_ROOT", "LCAGENTS_LOG", "NO_COLOR"] {
            println!(
                "    {:<18} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        println!();
    }
}

// ── Display helpers ──────────────────────────────────────────────────────────

#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
