//! sync-all: copy every `model_*.json` of every category.
//!
//! Files within a category are processed in a fixed order and the last one
//! copied becomes the category's result. With the default lexicographic
//! order this is "newest wins" only if file names sort by recency, e.g.
//! `model_20240105.json` or zero-padded `model_0042.json`. Use
//! [`sync_all_with`] when names follow another convention.

use std::cmp::Ordering;
use std::path::Path;

use crate::copier::resolve_and_copy;
use crate::layout::{category_dirs, model_files};
use crate::report::{SyncEvent, SyncReport};

/// Sync all model files, processing each category's files in name order.
pub fn sync_all(source_root: &Path, dest_root: &Path, overwrite: bool, dry_run: bool) -> SyncReport {
    sync_all_with(source_root, dest_root, overwrite, dry_run, |a, b| a.cmp(b))
}

/// Sync all model files, processing each category's files in `order`.
///
/// The last file in `order` that gets copied wins the category's result.
pub fn sync_all_with<F>(
    source_root: &Path,
    dest_root: &Path,
    overwrite: bool,
    dry_run: bool,
    mut order: F,
) -> SyncReport
where
    F: FnMut(&str, &str) -> Ordering,
{
    let mut report = SyncReport::default();

    let categories = match category_dirs(source_root) {
        Ok(c) => c,
        Err(e) => {
            report.push(SyncEvent::ScanFailed {
                path: source_root.to_path_buf(),
                error: e.to_string(),
            });
            return report;
        }
    };

    for (category, dir) in categories {
        tracing::debug!("scanning category: {category}");
        let mut files = match model_files(&dir) {
            Ok(f) => f,
            Err(e) => {
                report.push(SyncEvent::ScanFailed {
                    path: dir,
                    error: e.to_string(),
                });
                continue;
            }
        };
        files.sort_by(|a, b| order(a.as_str(), b.as_str()));

        for file in files {
            let source = dir.join(&file);
            let dest = dest_root.join(category.as_str()).join(&file);
            match resolve_and_copy(&source, &dest, overwrite, dry_run) {
                Ok(outcome) => report.record_copy(&category, &file, source, dest, outcome),
                Err(e) => report.push(SyncEvent::CopyFailed {
                    category: category.clone(),
                    path: source,
                    error: e.to_string(),
                }),
            }
        }
    }

    report
}
