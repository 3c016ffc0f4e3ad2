// Core configuration types
mod core;
mod loader;

pub use self::core::{BatchConfig, ComplexityConfig, Jq2ReactConfig, OutputConfig, ResourcesConfig};
pub use self::loader::{
    directory_ancestors, load_config, load_config_from, parse_config, CONFIG_FILE_NAME,
    DEFAULT_CONFIG,
};
