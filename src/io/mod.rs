pub mod walker;

pub use walker::{find_source_files, FileWalker};

use crate::errors::{ConvertError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| ConvertError::io(path, e))?;
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Hidden sibling used while a file is being written. Unique per write, so
/// concurrent writers of the same target never share a temporary file.
fn temp_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let sequence = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    target.with_file_name(format!(".{name}.{}.{sequence}.tmp", std::process::id()))
}

fn write_bytes_atomically(target: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }
    let temp = temp_path(target);
    let result = fs::write(&temp, data)
        .map_err(|e| ConvertError::io(&temp, e))
        .and_then(|()| fs::rename(&temp, target).map_err(|e| ConvertError::io(target, e)));
    if result.is_err() {
        // Never leave a half-written file behind.
        let _ = fs::remove_file(&temp);
    }
    result
}

/// Write `content` to `path` through a temporary file and a rename, so the
/// target either holds the full content or is untouched.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    write_bytes_atomically(path, content.as_bytes())
}

/// Copy `from` to `to` with the same all-or-nothing guarantee.
pub fn copy_file_atomic(from: &Path, to: &Path) -> Result<()> {
    let data = fs::read(from).map_err(|e| ConvertError::io(from, e))?;
    write_bytes_atomically(to, &data)
}
