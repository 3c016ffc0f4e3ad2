use anyhow::{Context, Result};
use clap::Parser;
use jq2react::cli::{Cli, Commands};
use jq2react::commands::{self, BatchCommand, ConvertCommand};
use tracing_subscriber::EnvFilter;

/// `RUST_LOG` wins; otherwise the `-v` count picks the level.
fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("jq2react={default_level}")));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// Main orchestrator function
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Init { force } => {
            let cwd = std::env::current_dir().context("Failed to read the current directory")?;
            commands::init_config(&cwd, force)
        }
        Commands::Convert { input, output } => {
            let config = commands::resolve_config(cli.config.as_deref())?;
            commands::run_convert(&ConvertCommand { input, output }, &config)
        }
        Commands::Batch {
            root,
            output,
            jobs,
            format,
        } => {
            let config = commands::resolve_config(cli.config.as_deref())?;
            let command = BatchCommand {
                root,
                output,
                jobs,
                format,
                quiet: cli.quiet,
            };
            commands::run_batch_command(&command, &config)
        }
    }
}
