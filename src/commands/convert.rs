use crate::config::Jq2ReactConfig;
use crate::pipeline::{convert_file, default_output_path, ConversionOutcome};
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConvertCommand {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
}

fn describe(outcome: &ConversionOutcome) -> String {
    let stats = &outcome.stats;
    let mut out = format!(
        "{} {} -> {} ({})\n",
        "Converted".green().bold(),
        outcome.input.display(),
        outcome.output.display(),
        outcome.component_name
    );
    out.push_str(&format!(
        "  {} selectors, {} handlers, {} mutations, {} style mutations, {} remote calls, {} animations\n",
        stats.selectors,
        stats.event_handlers,
        stats.mutations,
        stats.style_mutations,
        stats.remote_calls,
        stats.animations
    ));
    for path in outcome.written.iter().skip(1) {
        out.push_str(&format!("  wrote {}\n", path.display()));
    }
    for path in &outcome.missing_resources {
        out.push_str(&format!("  {} {} not found, not copied\n", "skipped".yellow(), path.display()));
    }
    if outcome.warnings > 0 || stats.animations > 0 {
        out.push_str(&format!(
            "  {} see the conversion report at the end of {}\n",
            "review:".yellow(),
            outcome.output.display()
        ));
    }
    out
}

pub fn run_convert(command: &ConvertCommand, config: &Jq2ReactConfig) -> Result<()> {
    let output = command
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&command.input, &config.output.extension));
    let resource_root = output
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let outcome = convert_file(&command.input, &output, &resource_root, config)
        .with_context(|| format!("Failed to convert {}", command.input.display()))?;
    print!("{}", describe(&outcome));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn converts_next_to_the_input_by_default() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("app.js");
        fs::write(&input, "$('#box').fadeIn();").unwrap();
        let command = ConvertCommand {
            input,
            output: None,
        };
        run_convert(&command, &Jq2ReactConfig::default()).unwrap();
        let code = fs::read_to_string(dir.path().join("app.jsx")).unwrap();
        assert!(code.contains("#box.fadeIn()"));
    }

    #[test]
    fn missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        let command = ConvertCommand {
            input: dir.path().join("missing.js"),
            output: None,
        };
        let err = run_convert(&command, &Jq2ReactConfig::default()).unwrap_err();
        assert!(err.to_string().contains("missing.js"));
    }
}
