//! Batch Orchestrator.
//!
//! Converts every eligible file under a root directory, mirroring relative
//! paths under the output root. Files are converted on a bounded rayon pool;
//! each conversion owns its builder, so workers share nothing but the
//! configuration. Linked resources are copied once for the whole batch after
//! the pool is done, since several pages often share a stylesheet. A failing
//! file is recorded in the summary and the rest of the batch carries on.

pub mod summary;

pub use summary::{complexity_score, rate, BatchSummary, ComplexityRating, FileStatus, FileSummary};

use crate::config::Jq2ReactConfig;
use crate::errors::{ConvertError, Result};
use crate::io::find_source_files;
use crate::pipeline::{copy_resources, mirrored_output_path, write_conversion, ResourceCopy};
use indicatif::ProgressBar;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, info_span, warn};

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub root: PathBuf,
    pub output_root: PathBuf,
    /// Worker threads; 0 means one per CPU.
    pub jobs: usize,
}

pub fn worker_count(jobs: usize) -> usize {
    if jobs == 0 {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(4)
    } else {
        jobs
    }
}

fn convert_one(
    file: &Path,
    options: &BatchOptions,
    config: &Jq2ReactConfig,
) -> (FileSummary, Vec<ResourceCopy>) {
    let relative = file
        .strip_prefix(&options.root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| file.to_path_buf());
    let output = mirrored_output_path(
        &options.root,
        file,
        &options.output_root,
        &config.output.extension,
    );

    match write_conversion(file, &output, &options.output_root, config) {
        Ok(outcome) => (
            FileSummary::converted(
                relative,
                outcome.output,
                outcome.component_name,
                outcome.warnings,
                outcome.stats,
                &config.complexity,
            ),
            outcome.resource_copies,
        ),
        Err(e) => {
            warn!(file = %file.display(), "Conversion failed: {}", e);
            (FileSummary::failed(relative, e.to_string()), Vec::new())
        }
    }
}

/// Convert the tree under `options.root`. Only a root that cannot be
/// traversed is an error; per-file failures end up in the summary.
pub fn run_batch(
    options: &BatchOptions,
    config: &Jq2ReactConfig,
    progress: &ProgressBar,
) -> Result<BatchSummary> {
    let _span = info_span!("batch", root = %options.root.display()).entered();

    let files = find_source_files(&options.root, &config.batch, Some(&options.output_root))?;
    let workers = worker_count(options.jobs);
    info!(files = files.len(), workers, "starting batch conversion");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .map_err(|e| ConvertError::WorkerPool(e.to_string()))?;

    progress.set_length(files.len() as u64);
    // Indexed collection keeps the summary in enumeration order.
    let results: Vec<(FileSummary, Vec<ResourceCopy>)> = pool.install(|| {
        files
            .par_iter()
            .map(|file| {
                let result = convert_one(file, options, config);
                progress.inc(1);
                result
            })
            .collect()
    });
    progress.finish_and_clear();

    let (summaries, copies): (Vec<_>, Vec<_>) = results.into_iter().unzip();
    let resources = copy_resources(copies.iter().flatten());
    info!(
        copied = resources.copied.len(),
        conflicts = resources.conflicts.len(),
        "resources copied"
    );

    Ok(BatchSummary::new(
        options.root.clone(),
        options.output_root.clone(),
        summaries,
        &config.complexity,
    )
    .with_resources(resources))
}
