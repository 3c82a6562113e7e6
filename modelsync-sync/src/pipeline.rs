//! Linear sync pipeline: sync → update manifest → cleanup.

use std::path::PathBuf;

use chrono::{Local, NaiveDateTime};

use modelsync_core::manifest;

use crate::{
    cleanup::{cleanup, cleanup_with_manifest, CleanupReport},
    report::SyncReport,
    sync_all, sync_best,
    update::{update_destination_manifest_at, ManifestUpdate},
    SyncError,
};

/// Which files a run copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// Only the file each source manifest entry names.
    #[default]
    Best,
    /// Every `model_*.json` in every category.
    All,
}

/// Everything a run needs. No ambient paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    pub mode: SyncMode,
    pub overwrite: bool,
    pub dry_run: bool,
    pub cleanup: bool,
}

impl SyncConfig {
    pub fn new(source_root: impl Into<PathBuf>, dest_root: impl Into<PathBuf>) -> Self {
        Self {
            source_root: source_root.into(),
            dest_root: dest_root.into(),
            mode: SyncMode::default(),
            overwrite: false,
            dry_run: false,
            cleanup: false,
        }
    }
}

/// Reports from every stage of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub sync: SyncReport,
    pub manifest: ManifestUpdate,
    /// `None` when cleanup was not requested or the manifest write failed.
    pub cleanup: Option<CleanupReport>,
}

impl RunReport {
    /// Number of categories whose best model changed this run.
    pub fn synced_count(&self) -> usize {
        self.sync.synced.len()
    }

    /// False when the destination manifest could not be written.
    pub fn is_success(&self) -> bool {
        !self.manifest.is_failed()
    }
}

/// Run the pipeline with the current local time.
pub fn run(config: &SyncConfig) -> Result<RunReport, SyncError> {
    run_at(config, Local::now().naive_local())
}

/// Run the pipeline, stamping manifest entries with `now`.
///
/// Fails only when the source root is missing. A failed destination
/// manifest write is reported as [`ManifestUpdate::Failed`] alongside the
/// sync report, and cleanup is skipped since the manifest on disk is stale.
/// In dry-run, cleanup is judged against the manifest the live run would
/// have written.
pub fn run_at(config: &SyncConfig, now: NaiveDateTime) -> Result<RunReport, SyncError> {
    if !config.source_root.exists() {
        return Err(SyncError::SourceNotFound {
            path: config.source_root.clone(),
        });
    }

    let sync = match config.mode {
        SyncMode::Best => sync_best(
            &config.source_root,
            &config.dest_root,
            config.overwrite,
            config.dry_run,
        ),
        SyncMode::All => sync_all(
            &config.source_root,
            &config.dest_root,
            config.overwrite,
            config.dry_run,
        ),
    };

    let manifest =
        match update_destination_manifest_at(&config.dest_root, &sync.synced, config.dry_run, now) {
            Ok(update) => update,
            Err(e) => {
                let path = manifest::manifest_path(&config.dest_root);
                tracing::warn!("could not write {}: {e}", path.display());
                ManifestUpdate::Failed {
                    path,
                    error: e.to_string(),
                }
            }
        };

    let cleanup = if !config.cleanup {
        None
    } else if manifest.is_failed() {
        tracing::warn!("skipping cleanup: destination manifest was not written");
        None
    } else if let (true, ManifestUpdate::WouldWrite(change)) = (config.dry_run, &manifest) {
        Some(CleanupReport::Swept(cleanup_with_manifest(
            &config.dest_root,
            &change.manifest,
            true,
        )))
    } else {
        Some(cleanup(&config.dest_root, config.dry_run))
    };

    Ok(RunReport {
        sync,
        manifest,
        cleanup,
    })
}
