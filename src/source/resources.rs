//! Resource Collector: local stylesheets and scripts a page references.
//!
//! Collection is pure path arithmetic. Whether the files actually exist is
//! only discovered when they are copied, and a missing file is skipped then.

use super::html;
use crate::config::ResourcesConfig;
use crate::descriptor::{ExternalResource, ResourceKind};
use std::path::{Path, PathBuf};

/// Absolute URLs, protocol-relative URLs and inline data never resolve locally.
fn is_remote(reference: &str) -> bool {
    let lower = reference.trim().to_ascii_lowercase();
    lower.starts_with("//")
        || lower.starts_with("data:")
        || lower.starts_with("javascript:")
        || lower
            .split_once(':')
            .is_some_and(|(scheme, _)| {
                // Single letters are Windows drive prefixes, not schemes.
                scheme.len() > 1
                    && scheme.chars().all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c))
            })
}

/// Drop `?v=3` cache busters and `#fragment` suffixes.
fn strip_query(reference: &str) -> &str {
    let end = reference.find(['?', '#']).unwrap_or(reference.len());
    &reference[..end]
}

fn is_excluded_library(reference: &str, config: &ResourcesConfig) -> bool {
    let name = Path::new(reference)
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    config
        .excluded_scripts
        .iter()
        .any(|library| name.contains(&library.to_ascii_lowercase()))
}

fn resolve(reference: &str, directory: &Path) -> Option<PathBuf> {
    let trimmed = reference.trim();
    if trimmed.is_empty() || is_remote(trimmed) {
        return None;
    }
    let local = strip_query(trimmed);
    if local.is_empty() {
        return None;
    }
    // Root-relative references resolve against the page directory.
    let relative = local.trim_start_matches('/');
    Some(directory.join(relative))
}

/// Collect local resources referenced by `raw` markup, in document order.
///
/// Stylesheets come first, then scripts; duplicates keep their first position.
pub fn collect_resources(
    raw: &str,
    directory: &Path,
    config: &ResourcesConfig,
) -> Vec<ExternalResource> {
    let stylesheets = html::stylesheet_links(raw)
        .into_iter()
        .map(|reference| (reference, ResourceKind::Stylesheet));
    let scripts = html::script_sources(raw)
        .into_iter()
        .filter(|reference| !is_excluded_library(strip_query(reference), config))
        .map(|reference| (reference, ResourceKind::Script));

    let mut resources: Vec<ExternalResource> = Vec::new();
    for (reference, kind) in stylesheets.chain(scripts) {
        let Some(resolved_path) = resolve(&reference, directory) else {
            continue;
        };
        if resources.iter().any(|r| r.resolved_path == resolved_path) {
            continue;
        }
        resources.push(ExternalResource {
            original_reference: reference,
            resolved_path,
            kind,
        });
    }
    resources
}
