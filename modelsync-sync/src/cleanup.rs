//! cleanup: delete destination model files the manifest does not name as best.
//!
//! Protection is derived from a manifest, never from the current run's sync
//! result, so the pass is safe to run on its own. Only regular files
//! matching `model_*.json` inside non-hidden category directories are ever
//! candidates for deletion.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use modelsync_core::{manifest, CategoryName, Manifest};

use crate::layout::{category_dirs, model_files};

/// Outcome of a cleanup pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupReport {
    /// No destination manifest; nothing was protected and nothing deleted.
    NoManifest { path: PathBuf },
    /// The destination manifest could not be read; nothing deleted.
    ManifestUnreadable { path: PathBuf, error: String },
    /// The sweep ran.
    Swept(CleanupSweep),
}

/// Per-file results of a sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanupSweep {
    /// Number of `(category, file)` pairs the manifest protects.
    pub protected: usize,
    pub preserved: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    /// `--dry-run`: files that *would* have been deleted.
    pub would_delete: Vec<PathBuf>,
    /// Files or directories that could not be processed.
    pub failures: Vec<(PathBuf, String)>,
}

/// Sweep `dest_root` against the manifest on disk.
pub fn cleanup(dest_root: &Path, dry_run: bool) -> CleanupReport {
    let path = manifest::manifest_path(dest_root);
    match manifest::load_at(dest_root) {
        Ok(Some(m)) => CleanupReport::Swept(cleanup_with_manifest(dest_root, &m, dry_run)),
        Ok(None) => {
            tracing::debug!("no manifest at {}, skipping cleanup", path.display());
            CleanupReport::NoManifest { path }
        }
        Err(e) => CleanupReport::ManifestUnreadable {
            path,
            error: e.to_string(),
        },
    }
}

/// Sweep `dest_root` against an in-memory manifest.
pub fn cleanup_with_manifest(dest_root: &Path, best: &Manifest, dry_run: bool) -> CleanupSweep {
    let protected: BTreeSet<(CategoryName, String)> = best.best_files();
    let mut sweep = CleanupSweep {
        protected: protected.len(),
        ..CleanupSweep::default()
    };
    if !dest_root.exists() {
        return sweep;
    }

    let categories = match category_dirs(dest_root) {
        Ok(c) => c,
        Err(e) => {
            sweep.failures.push((dest_root.to_path_buf(), e.to_string()));
            return sweep;
        }
    };

    for (category, dir) in categories {
        let files = match model_files(&dir) {
            Ok(f) => f,
            Err(e) => {
                sweep.failures.push((dir, e.to_string()));
                continue;
            }
        };

        for file in files {
            let path = dir.join(&file);
            if protected.contains(&(category.clone(), file)) {
                tracing::debug!("preserving best model: {}", path.display());
                sweep.preserved.push(path);
                continue;
            }

            if dry_run {
                tracing::info!("[dry-run] would delete: {}", path.display());
                sweep.would_delete.push(path);
                continue;
            }

            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!("deleted: {}", path.display());
                    sweep.deleted.push(path);
                }
                Err(e) => {
                    tracing::warn!("could not delete {}: {e}", path.display());
                    sweep.failures.push((path, e.to_string()));
                }
            }
        }
    }

    sweep
}
