use crate::batch::{run_batch, BatchOptions};
use crate::cli::SummaryFormat;
use crate::config::Jq2ReactConfig;
use crate::progress::{file_bar, ProgressConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct BatchCommand {
    pub root: PathBuf,
    pub output: Option<PathBuf>,
    pub jobs: Option<usize>,
    pub format: SummaryFormat,
    pub quiet: bool,
}

pub fn run_batch_command(command: &BatchCommand, config: &Jq2ReactConfig) -> Result<()> {
    let options = BatchOptions {
        root: command.root.clone(),
        output_root: command
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.batch_dir)),
        jobs: command.jobs.unwrap_or(config.batch.jobs),
    };

    let bar = file_bar(&ProgressConfig::from_env(command.quiet), "Converting");
    let summary = run_batch(&options, config, &bar)
        .with_context(|| format!("Failed to convert {}", command.root.display()))?;

    match command.format {
        SummaryFormat::Terminal => print!("{}", summary.render_table()),
        SummaryFormat::Json => println!(
            "{}",
            summary.to_json().context("Failed to serialize batch summary")?
        ),
    }
    Ok(())
}
