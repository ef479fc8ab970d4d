use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::config::BUNDLE_FILE_NAME;

/// One per-type export file found in the input directory.
#[derive(Clone, Debug, PartialEq)]
pub struct ContentFile {
    pub content_type: String,
    pub path: PathBuf,
}

/// Lists `*.json` files in `dir` (except the combined bundle), sorted by name.
/// Fails when the directory is missing or holds no qualifying file.
pub fn discover(dir: &Path) -> Result<Vec<ContentFile>> {
    if !dir.is_dir() {
        bail!("Input directory not found: {} (run `cms-migrate export` first)", dir.display());
    }

    let mut files: Vec<ContentFile> = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name == BUNDLE_FILE_NAME { continue; }
        let Some(content_type) = name.strip_suffix(".json") else { continue };
        if content_type.is_empty() { continue; }
        files.push(ContentFile { content_type: content_type.to_string(), path: entry.path() });
    }

    if files.is_empty() {
        bail!("No export files found in: {}", dir.display());
    }
    files.sort_by(|a, b| a.content_type.cmp(&b.content_type));
    Ok(files)
}
