//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Layered agent resources: resolve, inspect and safely delete
#[derive(Parser)]
#[command(
    name = "lcagents",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Path of the `.lcagents` directory [default: ./.lcagents]
    #[arg(long, global = true, env = "LCAGENTS_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List resources of a type across all layers
    List(commands::list::ListArgs),

    /// Show which layers contribute to an agent
    Resolve(commands::resolve::ResolveArgs),

    /// Show where a template resolves
    Template(commands::resolve::TemplateArgs),

    /// Show what depends on a resource
    Check(commands::check::CheckArgs),

    /// Delete a resource, with a backup
    Delete(commands::delete::DeleteArgs),

    /// Restore a resource from a backup
    Restore(commands::restore::RestoreArgs),

    /// List backups, newest first
    Backups,

    /// Create the layered directory structure
    Init,

    /// Move a flat `.lcagents` tree into a core system
    Migrate(commands::init::MigrateArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be built or the command fails.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            root,
            command,
        } = self;
        let yes = matches!(&command, Command::Delete(args) if args.yes);
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes, root },
        })?;

        match command {
            Command::List(args) => commands::list::run(&app, &args).await,
            Command::Resolve(args) => commands::resolve::run_agent(&app, &args).await,
            Command::Template(args) => commands::resolve::run_template(&app, &args).await,
            Command::Check(args) => commands::check::run(&app, &args).await,
            Command::Delete(args) => commands::delete::run(&app, &args).await,
            Command::Restore(args) => commands::restore::run(&app, &args).await,
            Command::Backups => commands::restore::list(&app).await,
            Command::Init => commands::init::init(&app).await,
            Command::Migrate(args) => commands::init::migrate(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
        }
    }
}
