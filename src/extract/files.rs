//! Capture file discovery and loading

use crate::error::{Error, Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extensions treated as captures
pub const CAPTURE_EXTENSIONS: &[&str] = &["txt", "json"];

/// List capture files directly inside `dir`, sorted by file name
pub fn capture_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::InputNotFound {
            path: dir.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_capture = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| CAPTURE_EXTENSIONS.contains(&ext));
        if is_capture && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Read every capture file in `dir` into one text, in file name order
pub fn load_capture_dir(dir: &Path) -> Result<String> {
    let files = capture_files(dir)?;
    if files.is_empty() {
        return Err(Error::NoCaptureFiles {
            path: dir.display().to_string(),
        });
    }

    let mut text = String::new();
    for path in &files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read capture file '{}'", path.display()))?;
        debug!("Loaded {} ({} bytes)", path.display(), content.len());
        text.push_str(&content);
        if !content.ends_with('\n') {
            text.push('\n');
        }
    }
    Ok(text)
}
