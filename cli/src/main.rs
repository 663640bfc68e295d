//! lcagents - layered agent resources with safe deletion

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use lcagents_cli::cli::Cli;
use lcagents_cli::output::json::format_error;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match format_error(&e) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr, filtered by `LCAGENTS_LOG` (then `RUST_LOG`), default `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("LCAGENTS_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
