//! `lcagents list <type>`: every resource of a type, per layer.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::ResourceType;

/// Arguments for the list command.
#[derive(Args)]
pub struct ListArgs {
    /// Resource type (agents, checklists, templates, data, tasks, workflows, utils)
    pub resource_type: ResourceType,
}

/// Run `lcagents list <type>`.
///
/// # Errors
///
/// Returns an error if a layer directory cannot be read.
pub async fn run(app: &AppContext, args: &ListArgs) -> Result<ExitCode> {
    let resources = app.resolver().list_resources(args.resource_type).await?;
    app.renderer()
        .render_resources(args.resource_type, &resources)?;
    Ok(ExitCode::SUCCESS)
}
