use serde::{Deserialize, Serialize};

/// Root configuration structure for jq2react
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Jq2ReactConfig {
    /// Output naming and placement
    #[serde(default)]
    pub output: OutputConfig,

    /// Batch mode file selection and parallelism
    #[serde(default)]
    pub batch: BatchConfig,

    /// External resource handling
    #[serde(default)]
    pub resources: ResourcesConfig,

    /// Complexity scoring for the batch summary
    #[serde(default)]
    pub complexity: ComplexityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Extension of generated component files
    #[serde(default = "default_component_extension")]
    pub extension: String,

    /// Extension of stylesheets extracted from embedded `<style>` blocks
    #[serde(default = "default_stylesheet_extension")]
    pub stylesheet_extension: String,

    /// Output directory used by batch mode when none is given
    #[serde(default = "default_batch_dir")]
    pub batch_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            extension: default_component_extension(),
            stylesheet_extension: default_stylesheet_extension(),
            batch_dir: default_batch_dir(),
        }
    }
}

fn default_component_extension() -> String {
    "jsx".to_string()
}

fn default_stylesheet_extension() -> String {
    "css".to_string()
}

fn default_batch_dir() -> String {
    "react-components".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchConfig {
    /// Source file extensions eligible for conversion
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names never descended into
    #[serde(default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Glob patterns of paths to leave alone
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Worker threads (0 = one per CPU)
    #[serde(default)]
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            ignore_patterns: Vec::new(),
            jobs: 0,
        }
    }
}

fn default_extensions() -> Vec<String> {
    ["js", "html", "htm"].iter().map(|s| s.to_string()).collect()
}

fn default_skip_dirs() -> Vec<String> {
    [
        "node_modules",
        ".git",
        ".svn",
        ".hg",
        "dist",
        "build",
        "vendor",
        "bower_components",
        "target",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourcesConfig {
    /// Script names (case-insensitive substrings) that are UI libraries
    /// with no component equivalent and are never copied
    #[serde(default = "default_excluded_scripts")]
    pub excluded_scripts: Vec<String>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            excluded_scripts: default_excluded_scripts(),
        }
    }
}

fn default_excluded_scripts() -> Vec<String> {
    [
        "jquery",
        "bootstrap",
        "popper",
        "lodash",
        "underscore",
        "moment",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Weights and thresholds of the batch complexity rating
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplexityConfig {
    #[serde(default = "default_selector_weight")]
    pub selector: u32,
    #[serde(default = "default_handler_weight")]
    pub handler: u32,
    #[serde(default = "default_mutation_weight")]
    pub mutation: u32,
    #[serde(default = "default_remote_call_weight")]
    pub remote_call: u32,
    #[serde(default = "default_animation_weight")]
    pub animation: u32,
    #[serde(default = "default_style_mutation_weight")]
    pub style_mutation: u32,

    /// Scores strictly above this are rated High
    #[serde(default = "default_high_threshold")]
    pub high: u32,

    /// Scores at or above this are rated Medium
    #[serde(default = "default_medium_threshold")]
    pub medium: u32,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        Self {
            selector: default_selector_weight(),
            handler: default_handler_weight(),
            mutation: default_mutation_weight(),
            remote_call: default_remote_call_weight(),
            animation: default_animation_weight(),
            style_mutation: default_style_mutation_weight(),
            high: default_high_threshold(),
            medium: default_medium_threshold(),
        }
    }
}

fn default_selector_weight() -> u32 {
    1
}

fn default_handler_weight() -> u32 {
    2
}

fn default_mutation_weight() -> u32 {
    2
}

fn default_remote_call_weight() -> u32 {
    3
}

fn default_animation_weight() -> u32 {
    2
}

fn default_style_mutation_weight() -> u32 {
    1
}

fn default_high_threshold() -> u32 {
    20
}

fn default_medium_threshold() -> u32 {
    10
}
