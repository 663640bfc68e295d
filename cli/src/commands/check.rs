//! `lcagents check <type> <name>`: dry run of the delete gate.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::dependency_check::check_dependencies;
use crate::domain::ResourceType;

/// Arguments for the check command.
#[derive(Args)]
pub struct CheckArgs {
    /// Resource type
    pub resource_type: ResourceType,
    /// Resource name, with or without extension
    pub name: String,
}

/// Run `lcagents check <type> <name>`.
///
/// # Errors
///
/// Returns an error if the name is malformed or a layer cannot be listed.
pub async fn run(app: &AppContext, args: &CheckArgs) -> Result<ExitCode> {
    let resolver = app.resolver();
    let result = check_dependencies(&resolver, &args.name, args.resource_type).await?;
    app.renderer()
        .render_dependency_check(args.resource_type, &args.name, &result)?;
    Ok(ExitCode::SUCCESS)
}
