//! sync-best: copy the file each category's source manifest names as best.

use std::path::Path;

use modelsync_core::{manifest, InvalidEntry};

use crate::copier::resolve_and_copy;
use crate::layout::is_plain_name;
use crate::report::{SyncEvent, SyncReport};

/// Sync the models listed in `<source_root>/best_models.json`.
///
/// Never fails as a whole: a missing or unreadable manifest yields an empty
/// result with one event explaining why, and every bad entry or missing file
/// is recorded and skipped.
pub fn sync_best(source_root: &Path, dest_root: &Path, overwrite: bool, dry_run: bool) -> SyncReport {
    let mut report = SyncReport::default();
    let path = manifest::manifest_path(source_root);

    let source_manifest = match manifest::load_at(source_root) {
        Ok(Some(m)) => m,
        Ok(None) => {
            report.push(SyncEvent::SourceManifestMissing { path });
            return report;
        }
        Err(e) => {
            report.push(SyncEvent::SourceManifestUnreadable {
                path,
                error: e.to_string(),
            });
            return report;
        }
    };
    tracing::debug!(
        "found {} categories in {}",
        source_manifest.len(),
        path.display()
    );

    for (category, entry) in source_manifest.entries() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(invalid) => {
                report.push(SyncEvent::InvalidEntry(invalid));
                continue;
            }
        };
        if !is_plain_name(category.as_str()) || !is_plain_name(&entry.model_file) {
            report.push(SyncEvent::InvalidEntry(InvalidEntry {
                category,
                reason: format!("`{}` escapes the category directory", entry.model_file),
            }));
            continue;
        }

        let source = source_root.join(category.as_str()).join(&entry.model_file);
        let dest = dest_root.join(category.as_str()).join(&entry.model_file);
        if !source.is_file() {
            report.push(SyncEvent::MissingSource {
                category,
                path: source,
            });
            continue;
        }

        match resolve_and_copy(&source, &dest, overwrite, dry_run) {
            Ok(outcome) => report.record_copy(&category, &entry.model_file, source, dest, outcome),
            Err(e) => report.push(SyncEvent::CopyFailed {
                category,
                path: source,
                error: e.to_string(),
            }),
        }
    }

    report
}
