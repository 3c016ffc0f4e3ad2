//! CLI command implementations.
//!
//! - **convert**: convert one script or page
//! - **batch**: convert a directory tree and print a summary
//! - **init**: write a default configuration file

pub mod batch;
pub mod convert;
pub mod init;

pub use batch::{run_batch_command, BatchCommand};
pub use convert::{run_convert, ConvertCommand};
pub use init::init_config;

use crate::config::{load_config, load_config_from, Jq2ReactConfig};
use anyhow::Result;
use std::path::Path;

/// The explicit `--config` file if given, otherwise the nearest one found
/// above the current directory, otherwise defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<Jq2ReactConfig> {
    match explicit {
        Some(path) => Ok(load_config_from(path)?),
        None => Ok(load_config()),
    }
}
