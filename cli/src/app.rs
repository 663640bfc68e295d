//! Application context: unified state passed to every command handler.
//!
//! `AppContext` resolves the `.lcagents` root, loads its configuration once
//! and owns the adapters every command needs.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::LayerResolver;
use crate::domain::layer::{LCAGENTS_DIR, LayerLayout};
use crate::domain::LcagentsConfig;
use crate::infra::config::YamlConfigStore;
use crate::infra::core_system::ConfigCoreSystemRegistry;
use crate::infra::fs::LocalFs;
use crate::output::reporter::TerminalReporter;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by the `CI` env var).
    pub yes: bool,
    /// Explicit `.lcagents` root (`--root` / `LCAGENTS_ROOT`).
    pub root: Option<PathBuf>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Paths of the layered tree.
    pub layout: LayerLayout,
    /// Configuration as loaded at startup.
    pub config: LcagentsConfig,
    /// Persistence for `config.yaml`.
    pub config_store: YamlConfigStore,
    /// Filesystem adapter.
    pub fs: LocalFs,
    /// Active core system oracle, backed by `config`.
    pub registry: ConfigCoreSystemRegistry,
    /// When `true`, skip interactive prompts and use defaults.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined or
    /// `config.yaml` exists but cannot be parsed.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let non_interactive = flags.behaviour.yes || std::env::var("CI").is_ok();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let root = match &flags.behaviour.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()
                .context("cannot determine current directory")?
                .join(LCAGENTS_DIR),
        };
        let mut layout = LayerLayout::new(root);
        let config_store = YamlConfigStore::new(layout.config_path());
        let config = config_store.load()?;
        if let Some(dir) = &config.backups.dir {
            layout = layout.with_backups_dir(dir);
        }
        tracing::debug!(root = %layout.root().display(), core_system = ?config.core_system, "context ready");

        // JSON mode keeps stdout for the JSON document alone.
        let quiet = flags.output.quiet || flags.output.json;

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            registry: ConfigCoreSystemRegistry::new(config.clone()),
            layout,
            config,
            config_store,
            fs: LocalFs,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Progress reporter for long-running services.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Resolver over this context's tree and core system.
    #[must_use]
    pub fn resolver(&self) -> LayerResolver<'_, LocalFs, ConfigCoreSystemRegistry> {
        LayerResolver::new(&self.fs, &self.registry, self.layout.clone())
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI or `--yes`), returns `default`
    /// immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
