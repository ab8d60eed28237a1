//! Binary entrypoint for code-snapshot.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Render styled images of source code excerpts
#[derive(Debug, Parser)]
#[command(name = "code-snapshot", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the snapshot described by a config file
    Generate {
        /// Path to a YAML or JSON config file
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("code_snapshot={level}").parse()?);
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init()
        .map_err(|err| anyhow!(err))?;
    Ok(())
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Generate { config } => {
            let snapshot = code_snapshot::generate(&config)
                .await
                .with_context(|| format!("generating snapshot from {}", config.display()))?;
            info!(
                width = snapshot.layout.canvas_width,
                height = snapshot.layout.canvas_height,
                diagnostics = snapshot.diagnostics.len(),
                "done"
            );
            Ok(())
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_tracing(cli.verbose) {
        eprintln!("error: {err:#}");
        return ExitCode::FAILURE;
    }
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
