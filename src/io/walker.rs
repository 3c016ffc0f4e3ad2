use crate::config::BatchConfig;
use crate::errors::{ConvertError, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Finds the files batch mode converts.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    skip_dirs: Vec<String>,
    ignore_patterns: Vec<glob::Pattern>,
    excluded: Option<PathBuf>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        let defaults = BatchConfig::default();
        Self {
            root,
            extensions: defaults.extensions,
            skip_dirs: defaults.skip_dirs,
            ignore_patterns: Vec::new(),
            excluded: None,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_skip_dirs(mut self, skip_dirs: Vec<String>) -> Self {
        self.skip_dirs = skip_dirs;
        self
    }

    /// Glob patterns matched against the path relative to the root.
    /// Invalid patterns are logged and dropped.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns
            .iter()
            .filter_map(|pattern| match glob::Pattern::new(pattern) {
                Ok(compiled) => Some(compiled),
                Err(e) => {
                    warn!(pattern = %pattern, "Ignoring invalid glob pattern: {}", e);
                    None
                }
            })
            .collect();
        self
    }

    /// Never descend into `dir`, typically the output root.
    pub fn excluding(mut self, dir: &Path) -> Self {
        self.excluded = Some(normalize(dir));
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(ConvertError::walk(&self.root, "not a directory"));
        }

        let skip_dirs = self.skip_dirs.clone();
        let excluded = self.excluded.clone();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                if !is_dir || entry.depth() == 0 {
                    return true;
                }
                let name = entry.file_name().to_string_lossy();
                if skip_dirs.iter().any(|skip| *skip == name) {
                    return false;
                }
                excluded
                    .as_ref()
                    .is_none_or(|excluded| normalize(entry.path()) != *excluded)
            })
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", self.root.display(), e);
                    continue;
                }
            };
            let path = entry.path();
            if entry.file_type().is_some_and(|t| t.is_file()) && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy().to_ascii_lowercase();
        if !self.extensions.contains(&ext) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .ignore_patterns
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

fn normalize(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

/// Eligible files under `root` per the batch configuration, sorted.
pub fn find_source_files(
    root: &Path,
    config: &BatchConfig,
    output_dir: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let walker = FileWalker::new(root.to_path_buf())
        .with_extensions(config.extensions.clone())
        .with_skip_dirs(config.skip_dirs.clone())
        .with_ignore_patterns(&config.ignore_patterns);
    match output_dir {
        Some(dir) => walker.excluding(dir).walk(),
        None => walker.walk(),
    }
}
