//! Models-root directory layout: category directories and model file names.

use std::path::{Path, PathBuf};

use modelsync_core::CategoryName;

use crate::error::{io_err, SyncError};

/// Prefix of discoverable model files (`model_*.json`).
pub const MODEL_PREFIX: &str = "model_";
/// Suffix of discoverable model files (`model_*.json`).
pub const MODEL_SUFFIX: &str = ".json";

/// Whether `name` matches the `model_*.json` pattern.
pub fn is_model_file_name(name: &str) -> bool {
    name.len() >= MODEL_PREFIX.len() + MODEL_SUFFIX.len()
        && name.starts_with(MODEL_PREFIX)
        && name.ends_with(MODEL_SUFFIX)
}

/// Whether `name` is usable as a single path component below a models root.
pub fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// Non-hidden category directories under `root`, sorted by name.
///
/// Directories whose names are not valid UTF-8 are skipped.
pub fn category_dirs(root: &Path) -> Result<Vec<(CategoryName, PathBuf)>, SyncError> {
    let mut dirs: Vec<(CategoryName, PathBuf)> = std::fs::read_dir(root)
        .map_err(|e| io_err(root, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir())
        .filter_map(|e| {
            let name = e.file_name().to_str().map(CategoryName::from)?;
            Some((name, e.path()))
        })
        .filter(|(name, _)| !name.is_hidden())
        .collect();
    dirs.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(dirs)
}

/// File names in `dir` matching `model_*.json`, sorted by name.
pub fn model_files(dir: &Path) -> Result<Vec<String>, SyncError> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .filter_map(|e| e.file_name().to_str().map(str::to_owned))
        .filter(|name| is_model_file_name(name))
        .collect();
    names.sort();
    Ok(names)
}
