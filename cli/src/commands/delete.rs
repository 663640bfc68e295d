//! `lcagents delete <type> <name>`: safe delete with backup and rollback.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::safe_delete::{DeleteOptions, safe_delete};
use crate::domain::ResourceType;

/// Arguments for the delete command.
#[derive(Args)]
pub struct DeleteArgs {
    /// Resource type
    pub resource_type: ResourceType,

    /// Resource name, with or without extension
    pub name: String,

    /// Delete even if agents or resources still reference it
    #[arg(long)]
    pub force: bool,

    /// Remove the reference from every dependent agent
    #[arg(long)]
    pub update_deps: bool,

    /// Do not back up before deleting
    #[arg(long)]
    pub skip_backup: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `lcagents delete <type> <name>`.
///
/// # Errors
///
/// Returns the typed refusal (`CoreResourceProtected`, `DependenciesExist`,
/// `NoActiveCoreSystem`) or the error that interrupted the delete.
pub async fn run(app: &AppContext, args: &DeleteArgs) -> Result<ExitCode> {
    if !app.output.quiet {
        println!();
        println!("This will delete {} '{}'.", args.resource_type, args.name);
        if args.skip_backup {
            println!("No backup will be taken.");
        }
        println!();
    }

    if !app.confirm("Continue?", true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    let options = DeleteOptions {
        force: args.force,
        update_deps: args.update_deps,
        skip_backup: args.skip_backup,
    };
    let resolver = app.resolver();
    let reporter = app.reporter();
    let outcome = safe_delete(&resolver, &reporter, args.resource_type, &args.name, options).await?;
    app.renderer().render_delete(&outcome)?;
    Ok(ExitCode::SUCCESS)
}
