//! `lcagents init` and `lcagents migrate <core>`: scaffolding.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::domain::layer::validate_resource_name;

/// Arguments for the migrate command.
#[derive(Args)]
pub struct MigrateArgs {
    /// Core system to move the flat resource directories into
    pub core_system: String,
}

/// Run `lcagents init`.
///
/// # Errors
///
/// Returns an error if a directory cannot be created.
pub async fn init(app: &AppContext) -> Result<ExitCode> {
    app.resolver().create_layered_structure().await?;
    app.output.success(&format!(
        "Layered structure ready at {}",
        app.layout.root().display()
    ));
    if app.config.core_system.is_none() {
        app.output
            .info("Set a core system: lcagents config set core-system <id>");
    }
    Ok(ExitCode::SUCCESS)
}

/// Run `lcagents migrate <core>`.
///
/// # Errors
///
/// Returns an error if the name is malformed or a move fails.
pub async fn migrate(app: &AppContext, args: &MigrateArgs) -> Result<ExitCode> {
    validate_resource_name(&args.core_system)?;
    let resolver = app.resolver();
    resolver.create_layered_structure().await?;
    let report = resolver
        .migrate_from_flat_structure(&args.core_system)
        .await?;
    let virtual_dir = resolver
        .create_virtual_resolution_system(&args.core_system)
        .await?;
    app.renderer()
        .render_migration(&args.core_system, &report, &virtual_dir)?;
    Ok(ExitCode::SUCCESS)
}
