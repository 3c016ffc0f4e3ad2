//! Single-file conversion: read, extract, generate, write.
//!
//! [`convert_document`] is the pure part and touches no files.
//! [`convert_file`] adds the I/O around it: the component and stylesheet are
//! written atomically, and local resources are copied next to the output.
//! Batch mode writes each file with [`write_conversion`] and copies the
//! resources of the whole batch once, after every worker is done.

use crate::codegen::{self, CodegenOptions, GeneratedComponent};
use crate::config::Jq2ReactConfig;
use crate::descriptor::{ComponentBuilder, ComponentDescriptor, ConversionStats, ResourceKind};
use crate::errors::Result;
use crate::extraction;
use crate::io;
use crate::naming;
use crate::source::{collect_resources, DocumentKind, SourceDocument};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span, warn};

/// Subdirectory of the output root that receives copied scripts.
pub const SCRIPTS_DIR: &str = "utils";

#[derive(Debug, Clone)]
pub struct Conversion {
    pub descriptor: ComponentDescriptor,
    pub generated: GeneratedComponent,
}

/// What a file conversion produced on disk.
#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub component_name: String,
    pub stats: ConversionStats,
    pub warnings: usize,
    pub written: Vec<PathBuf>,
    /// Referenced resources that did not exist and were not copied.
    pub missing_resources: Vec<PathBuf>,
    /// Local resources to place under the resource root.
    pub resource_copies: Vec<ResourceCopy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Two different files that would land on the same destination. The first
/// one in conversion order is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceConflict {
    pub destination: PathBuf,
    pub kept: PathBuf,
    pub skipped: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CopyReport {
    pub copied: Vec<PathBuf>,
    pub conflicts: Vec<ResourceConflict>,
    pub errors: Vec<String>,
}

/// Convert an in-memory document. Every conversion gets its own builder.
pub fn convert_document(document: &SourceDocument, config: &Jq2ReactConfig) -> Result<Conversion> {
    let mut builder = ComponentBuilder::new(
        naming::component_name(&document.base_name),
        document.file_name.clone(),
    );
    if document.kind == DocumentKind::Html {
        builder.set_resources(collect_resources(
            &document.raw,
            &document.directory,
            &config.resources,
        ));
        builder.set_embedded_styles(document.embedded_styles());
    }

    extraction::extract(&document.script_text(), &mut builder)?;
    let descriptor = builder.finish();
    let generated = codegen::generate(
        &descriptor,
        &CodegenOptions {
            stylesheet_extension: config.output.stylesheet_extension.clone(),
        },
    );
    Ok(Conversion {
        descriptor,
        generated,
    })
}

/// `app.js` → `app.jsx` next to the input.
pub fn default_output_path(input: &Path, extension: &str) -> PathBuf {
    input.with_extension(extension)
}

/// Where batch mode writes `input`: its path relative to `root`, under `output_root`.
pub fn mirrored_output_path(root: &Path, input: &Path, output_root: &Path, extension: &str) -> PathBuf {
    let relative = input
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .ok()
        .or_else(|| pathdiff::diff_paths(input, root))
        .unwrap_or_else(|| input.file_name().map(PathBuf::from).unwrap_or_default());
    output_root.join(relative).with_extension(extension)
}

fn resource_destination(resource_root: &Path, resolved: &Path, kind: ResourceKind) -> Option<PathBuf> {
    let name = resolved.file_name()?;
    Some(match kind {
        ResourceKind::Stylesheet => resource_root.join(name),
        ResourceKind::Script => resource_root.join(SCRIPTS_DIR).join(name),
    })
}

/// One copy per destination. A destination claimed by a different source
/// is reported as a conflict instead of being overwritten.
pub fn plan_resource_copies<'a>(
    copies: impl IntoIterator<Item = &'a ResourceCopy>,
) -> (Vec<ResourceCopy>, Vec<ResourceConflict>) {
    let mut claimed: BTreeMap<&Path, &Path> = BTreeMap::new();
    let mut planned = Vec::new();
    let mut conflicts = Vec::new();
    for copy in copies {
        match claimed.get(copy.destination.as_path()) {
            Some(kept) if *kept == copy.source.as_path() => {}
            Some(kept) => {
                warn!(
                    destination = %copy.destination.display(),
                    kept = %kept.display(),
                    skipped = %copy.source.display(),
                    "Two resources share a destination, keeping the first"
                );
                conflicts.push(ResourceConflict {
                    destination: copy.destination.clone(),
                    kept: kept.to_path_buf(),
                    skipped: copy.source.clone(),
                });
            }
            None => {
                claimed.insert(&copy.destination, &copy.source);
                planned.push(copy.clone());
            }
        }
    }
    (planned, conflicts)
}

/// Copy every planned resource. Failures are collected, not raised, so one
/// unreadable file does not hide the others.
pub fn copy_resources<'a>(copies: impl IntoIterator<Item = &'a ResourceCopy>) -> CopyReport {
    let (planned, conflicts) = plan_resource_copies(copies);
    let mut report = CopyReport {
        conflicts,
        ..CopyReport::default()
    };
    for copy in planned {
        match io::copy_file_atomic(&copy.source, &copy.destination) {
            Ok(()) => report.copied.push(copy.destination),
            Err(e) => {
                warn!(resource = %copy.source.display(), "Resource copy failed: {}", e);
                report.errors.push(e.to_string());
            }
        }
    }
    report
}

/// Convert `input` and write the component and its stylesheet. Resources
/// are only planned here; see [`copy_resources`].
pub fn write_conversion(
    input: &Path,
    output: &Path,
    resource_root: &Path,
    config: &Jq2ReactConfig,
) -> Result<ConversionOutcome> {
    let _span = info_span!("convert", file = %input.display()).entered();

    let document = SourceDocument::load(input)?;
    let Conversion {
        descriptor,
        generated,
    } = convert_document(&document, config)?;

    let mut written = Vec::new();
    io::write_file_atomic(output, &generated.code)?;
    written.push(output.to_path_buf());

    if let Some(stylesheet) = &generated.stylesheet {
        let path = output.with_file_name(&stylesheet.file_name);
        io::write_file_atomic(&path, &stylesheet.contents)?;
        written.push(path);
    }

    let mut missing_resources = Vec::new();
    let mut resource_copies = Vec::new();
    for resource in &descriptor.resources {
        if !io::file_exists(&resource.resolved_path) {
            warn!(
                resource = %resource.original_reference,
                path = %resource.resolved_path.display(),
                "Referenced resource not found, skipping copy"
            );
            missing_resources.push(resource.resolved_path.clone());
            continue;
        }
        if let Some(destination) =
            resource_destination(resource_root, &resource.resolved_path, resource.kind)
        {
            resource_copies.push(ResourceCopy {
                source: resource.resolved_path.clone(),
                destination,
            });
        }
    }

    debug!(
        files = written.len(),
        resources = resource_copies.len(),
        warnings = descriptor.warnings.len(),
        "conversion written"
    );

    Ok(ConversionOutcome {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        component_name: generated.component_name,
        stats: descriptor.stats(),
        warnings: descriptor.warnings.len(),
        written,
        missing_resources,
        resource_copies,
    })
}

/// Convert `input` and write the component to `output`. Copied resources go
/// under `resource_root`: stylesheets at its top, scripts in `utils/`.
pub fn convert_file(
    input: &Path,
    output: &Path,
    resource_root: &Path,
    config: &Jq2ReactConfig,
) -> Result<ConversionOutcome> {
    let mut outcome = write_conversion(input, output, resource_root, config)?;
    let (planned, _conflicts) = plan_resource_copies(&outcome.resource_copies);
    for copy in planned {
        io::copy_file_atomic(&copy.source, &copy.destination)?;
        outcome.written.push(copy.destination);
    }
    Ok(outcome)
}
