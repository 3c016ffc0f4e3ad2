//! Progress feedback for batch conversions.
//!
//! Bars are drawn with `indicatif` on stderr and only when stderr is a
//! terminal, so piped output and CI logs stay clean. `--quiet` or the
//! `JQ2REACT_QUIET` environment variable turn them off entirely.

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_FILES: &str = "{spinner} {msg} {pos}/{len} files ({percent}%) - {eta}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    /// Whether to suppress all progress output
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("JQ2REACT_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

/// A bar counting converted files, or a hidden one when progress is off.
pub fn file_bar(config: &ProgressConfig, message: &str) -> ProgressBar {
    if !config.should_show_progress() {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(0);
    match ProgressStyle::default_bar().template(TEMPLATE_FILES) {
        Ok(style) => bar.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")),
        Err(e) => tracing::debug!("Falling back to the default progress style: {}", e),
    }
    bar.set_message(message.to_string());
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_quiet_flag_hides_bars() {
        let config = ProgressConfig::from_env(true);
        assert!(!config.should_show_progress());
        assert!(file_bar(&config, "Converting").is_hidden());
    }
}
