//! Atomic target file writer
//!
//! Content goes to a uniquely named sibling temp file which is then renamed
//! over the target. Readers see either the old file or the new one, never a
//! partial write. Concurrent writers to the same target: last rename wins.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Distinguishes temp files written by the same process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Write `content` to `path` atomically, returning the bytes written
pub fn write_atomic(path: &Path, content: &[u8]) -> Result<u64> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::fs::create_dir_all(dir).map_err(|e| Error::write_failure(dir, e.to_string()))?;

    let temp_path = temp_path_for(dir, path);
    if let Err(e) = std::fs::write(&temp_path, content) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::write_failure(path, e.to_string()));
    }

    if let Err(e) = std::fs::rename(&temp_path, path) {
        let _ = std::fs::remove_file(&temp_path);
        return Err(Error::write_failure(path, e.to_string()));
    }

    tracing::debug!(path = %path.display(), bytes = content.len(), "Wrote target file");
    Ok(content.len() as u64)
}

fn temp_path_for(dir: &Path, path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let seq = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    dir.join(format!(".{name}.{}.{seq}.tmp", std::process::id()))
}
