//! `lcagents restore <backup>` and `lcagents backups`.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::backup_store::list_backups;
use crate::application::services::safe_delete::restore;

/// Arguments for the restore command.
#[derive(Args)]
pub struct RestoreArgs {
    /// Backup directory name (see `lcagents backups`) or path
    pub backup: String,
}

/// Run `lcagents restore <backup>`.
///
/// # Errors
///
/// Returns `NotFound`, `InvalidBackup` or `StaleLocation`, or an I/O error.
pub async fn run(app: &AppContext, args: &RestoreArgs) -> Result<ExitCode> {
    let resolver = app.resolver();
    let metadata = restore(&resolver, &app.reporter(), &args.backup).await?;
    app.renderer().render_restore(&metadata)?;
    Ok(ExitCode::SUCCESS)
}

/// Run `lcagents backups`.
///
/// # Errors
///
/// Returns an error if the backups directory cannot be listed.
pub async fn list(app: &AppContext) -> Result<ExitCode> {
    let backups = list_backups(&app.resolver()).await?;
    app.renderer().render_backups(&backups)?;
    Ok(ExitCode::SUCCESS)
}
