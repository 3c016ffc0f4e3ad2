//! Error types for conversion operations.
//!
//! Only I/O-shaped failures are errors. Script fragments that do not match a
//! known idiom are skipped by the extractor and never surface here.

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    /// Reading, writing or copying a file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failed
    #[error("Failed to walk {}: {message}", path.display())]
    Walk { path: PathBuf, message: String },

    /// The parser produced no syntax tree at all
    #[error("Failed to parse script in {}", path.display())]
    Parse { path: PathBuf },

    /// Configuration file could not be read or parsed
    #[error("Configuration error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The JavaScript grammar could not be loaded
    #[error("Failed to load JavaScript grammar: {0}")]
    Language(String),

    /// Worker pool setup failed
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn walk(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Walk {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The file this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Io { path, .. }
            | Self::Walk { path, .. }
            | Self::Parse { path }
            | Self::Config { path, .. } => Some(path),
            Self::Language(_) | Self::WorkerPool(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;
