//! update-destination-manifest: merge this run's result into the
//! destination `best_models.json`.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};

use modelsync_core::{manifest, CategoryName, Manifest, ManifestEntry};

use crate::error::SyncError;
use crate::report::SyncResult;

/// What the manifest update did.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestUpdate {
    /// Nothing was synced; the manifest was not touched.
    NothingToUpdate,
    /// `--dry-run`: the manifest *would* have been written.
    WouldWrite(ManifestChange),
    /// The manifest was rewritten atomically.
    Written(ManifestChange),
    /// The rewrite failed; the manifest on disk is unchanged.
    Failed { path: PathBuf, error: String },
}

/// Details of a (possibly simulated) manifest rewrite.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestChange {
    pub path: PathBuf,
    /// Entries upserted this run, in category order.
    pub updated: Vec<(CategoryName, ManifestEntry)>,
    /// Set when the existing manifest could not be read and the update
    /// started from an empty one.
    pub recovered_from: Option<String>,
    /// The full manifest as written (or as it would be written).
    pub manifest: Manifest,
}

impl ManifestUpdate {
    pub fn change(&self) -> Option<&ManifestChange> {
        match self {
            Self::NothingToUpdate | Self::Failed { .. } => None,
            Self::WouldWrite(c) | Self::Written(c) => Some(c),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Upsert every synced category into `<dest_root>/best_models.json`,
/// stamped with the current local time.
pub fn update_destination_manifest(
    dest_root: &Path,
    synced: &SyncResult,
    dry_run: bool,
) -> Result<ManifestUpdate, SyncError> {
    update_destination_manifest_at(dest_root, synced, dry_run, Local::now().naive_local())
}

/// [`update_destination_manifest`] with an explicit timestamp.
///
/// Every entry written in one call shares `now`.
pub fn update_destination_manifest_at(
    dest_root: &Path,
    synced: &SyncResult,
    dry_run: bool,
    now: NaiveDateTime,
) -> Result<ManifestUpdate, SyncError> {
    if synced.is_empty() {
        return Ok(ManifestUpdate::NothingToUpdate);
    }

    let path = manifest::manifest_path(dest_root);
    let (mut dest_manifest, recovered_from) = match manifest::load_at(dest_root) {
        Ok(existing) => (existing.unwrap_or_default(), None),
        Err(e) => {
            tracing::warn!("starting from an empty manifest: {e}");
            (Manifest::new(), Some(e.to_string()))
        }
    };

    let mut updated = Vec::with_capacity(synced.len());
    for (category, model_file) in synced {
        let entry = ManifestEntry::stamped(model_file.as_str(), now);
        dest_manifest.upsert(category, &entry)?;
        tracing::debug!("best model for {category}: {model_file}");
        updated.push((category.clone(), entry));
    }

    let change = ManifestChange {
        path,
        updated,
        recovered_from,
        manifest: dest_manifest,
    };

    if dry_run {
        tracing::info!("[dry-run] would update: {}", change.path.display());
        return Ok(ManifestUpdate::WouldWrite(change));
    }

    manifest::save_at(dest_root, &change.manifest)?;
    tracing::info!("updated: {}", change.path.display());
    Ok(ManifestUpdate::Written(change))
}
