use std::fs;
use std::path::{Path, PathBuf};

use super::core::Jq2ReactConfig;
use crate::errors::{ConvertError, Result};

pub const CONFIG_FILE_NAME: &str = ".jq2react.toml";

/// Parse configuration from TOML text
pub fn parse_config(contents: &str) -> std::result::Result<Jq2ReactConfig, String> {
    toml::from_str::<Jq2ReactConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))
}

/// Load an explicitly requested configuration file; failures are errors
pub fn load_config_from(path: &Path) -> Result<Jq2ReactConfig> {
    let contents = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    parse_config(&contents).map_err(|message| ConvertError::config(path, message))
}

/// Try one candidate path during discovery; problems are logged, not raised
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<Jq2ReactConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            tracing::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            tracing::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Directory ancestors of `start`, nearest first, at most `max_depth` of them
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.jq2react.toml` above the current directory
pub fn load_config() -> Jq2ReactConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return Jq2ReactConfig::default();
        }
    };

    directory_ancestors(current, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Jq2ReactConfig::default()
        })
}

pub const DEFAULT_CONFIG: &str = r#"# jq2react configuration

[output]
extension = "jsx"
stylesheet_extension = "css"
batch_dir = "react-components"

[batch]
extensions = ["js", "html", "htm"]
skip_dirs = ["node_modules", ".git", ".svn", ".hg", "dist", "build", "vendor", "bower_components", "target"]
ignore_patterns = ["**/*.min.js"]
jobs = 0

[resources]
# UI libraries with no component equivalent; matching scripts are not copied
excluded_scripts = ["jquery", "bootstrap", "popper", "lodash", "underscore", "moment"]

[complexity]
selector = 1
handler = 2
mutation = 2
remote_call = 3
animation = 2
style_mutation = 1
high = 20
medium = 10
"#;
