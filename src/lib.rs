// Export modules for library usage
pub mod batch;
pub mod cli;
pub mod codegen;
pub mod commands;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod extraction;
pub mod io;
pub mod naming;
pub mod pipeline;
pub mod progress;
pub mod source;
pub mod text;

// Re-export commonly used types
pub use crate::batch::{run_batch, BatchOptions, BatchSummary, ComplexityRating};
pub use crate::codegen::{generate, CodegenOptions, ConversionReport, GeneratedComponent};
pub use crate::config::Jq2ReactConfig;
pub use crate::descriptor::{ComponentBuilder, ComponentDescriptor, ConversionStats};
pub use crate::errors::{ConvertError, Result};
pub use crate::pipeline::{convert_document, convert_file, Conversion, ConversionOutcome};
pub use crate::source::SourceDocument;
