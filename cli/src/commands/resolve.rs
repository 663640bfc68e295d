//! `lcagents resolve <agent>` and `lcagents template <name>`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::layer::validate_resource_name;

/// Arguments for the resolve command.
#[derive(Args)]
pub struct ResolveArgs {
    /// Agent identifier
    pub agent: String,

    /// Resolve against this core system instead of the active one
    #[arg(long, value_name = "ID")]
    pub core_system: Option<String>,
}

/// Arguments for the template command.
#[derive(Args)]
pub struct TemplateArgs {
    /// Template name, with or without extension
    pub name: String,
}

/// Run `lcagents resolve <agent>`.
///
/// An unresolved agent (no core system) is reported, not treated as a
/// failure.
///
/// # Errors
///
/// Returns an error if the agent or core system name is malformed.
pub async fn run_agent(app: &AppContext, args: &ResolveArgs) -> Result<ExitCode> {
    validate_resource_name(&args.agent)?;
    if let Some(core) = &args.core_system {
        validate_resource_name(core)?;
    }
    let resolution = app
        .resolver()
        .resolve_agent(&args.agent, args.core_system.as_deref())
        .await
        .into_path();
    app.renderer().render_agent_resolution(&resolution)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `lcagents template <name>`.
///
/// # Errors
///
/// Returns `ResourceError::NotFound` if no layer has the template.
pub async fn run_template(app: &AppContext, args: &TemplateArgs) -> Result<ExitCode> {
    let resolved = app.resolver().resolve_template(&args.name).await?;
    app.renderer().render_resolved(&resolved)?;
    Ok(ExitCode::SUCCESS)
}
