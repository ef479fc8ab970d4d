use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

/// Creates the directory tree if needed. Returns true when it did not exist.
pub fn ensure_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() { return Ok(false); }
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {}", dir.display()))?;
    Ok(true)
}

/// Writes `value` as 2-space indented JSON, replacing any existing file.
pub fn write_json<T: Serialize + ?Sized>(path: PathBuf, value: &T) -> Result<PathBuf> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
