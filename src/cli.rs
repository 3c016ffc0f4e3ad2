use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "jq2react")]
#[command(about = "Convert jQuery scripts and pages into React components", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (defaults to the nearest .jq2react.toml)
    #[arg(long, global = true, env = "JQ2REACT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Suppress progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert one script or HTML page
    Convert {
        /// Input file (.js, .html or .htm)
        input: PathBuf,

        /// Output component file (defaults to the input with a .jsx extension)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert every eligible file under a directory
    Batch {
        /// Root directory to convert
        root: PathBuf,

        /// Output directory (defaults to react-components)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of parallel jobs (0 = one per CPU)
        #[arg(short = 'j', long)]
        jobs: Option<usize>,

        /// Summary format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: SummaryFormat,
    },

    /// Write a default .jq2react.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    Terminal,
    Json,
}
