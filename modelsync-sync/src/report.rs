//! Per-run sync results and the events behind them.

use std::collections::BTreeMap;
use std::path::PathBuf;

use modelsync_core::{CategoryName, InvalidEntry};

use crate::copier::CopyOutcome;

/// Category -> file name copied for it in this run (last write wins).
pub type SyncResult = BTreeMap<CategoryName, String>;

/// One decision taken while syncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncEvent {
    /// A model file went through `resolve_and_copy`.
    Copy {
        category: CategoryName,
        file: String,
        source: PathBuf,
        dest: PathBuf,
        outcome: CopyOutcome,
    },
    /// The source manifest does not exist.
    SourceManifestMissing { path: PathBuf },
    /// The source manifest could not be read or parsed.
    SourceManifestUnreadable { path: PathBuf, error: String },
    /// A manifest entry is not a usable `{model_file: ...}` record.
    InvalidEntry(InvalidEntry),
    /// The manifest names a model file that is not on disk.
    MissingSource { category: CategoryName, path: PathBuf },
    /// A directory could not be listed.
    ScanFailed { path: PathBuf, error: String },
    /// Copying a file failed; the run carried on.
    CopyFailed {
        category: CategoryName,
        path: PathBuf,
        error: String,
    },
}

/// Outcome of sync-best or sync-all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: SyncResult,
    pub events: Vec<SyncEvent>,
}

impl SyncReport {
    pub(crate) fn push(&mut self, event: SyncEvent) {
        self.events.push(event);
    }

    /// Record a copy outcome; copied files become the category's result.
    pub(crate) fn record_copy(
        &mut self,
        category: &CategoryName,
        file: &str,
        source: PathBuf,
        dest: PathBuf,
        outcome: CopyOutcome,
    ) {
        if outcome.copied() {
            self.synced.insert(category.clone(), file.to_string());
        }
        self.push(SyncEvent::Copy {
            category: category.clone(),
            file: file.to_string(),
            source,
            dest,
            outcome,
        });
    }

    /// Copy outcomes in processing order.
    pub fn outcomes(&self) -> impl Iterator<Item = CopyOutcome> + '_ {
        self.events.iter().filter_map(|e| match e {
            SyncEvent::Copy { outcome, .. } => Some(*outcome),
            _ => None,
        })
    }

    /// Number of files copied (or that would be copied in dry-run).
    pub fn copied_count(&self) -> usize {
        self.outcomes().filter(|o| o.copied()).count()
    }
}
