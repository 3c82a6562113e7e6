//! Hash-gated model copy.
//!
//! ## `resolve_and_copy` — decision table
//!
//! | destination            | `overwrite` | outcome                         |
//! |------------------------|-------------|---------------------------------|
//! | missing                | any         | `Copied` / `WouldCopy`          |
//! | same digest            | any         | `UpToDate`                      |
//! | different digest       | `false`     | `SkippedDiffers`                |
//! | different digest       | `true`      | `Overwritten` / `WouldOverwrite`|
//!
//! Dry-run takes every decision a live run takes and stops before the first
//! filesystem mutation.
//!
//! Live copies go through `<dest>.modelsync.tmp` + rename so a model file is
//! never observed half-copied. Source access and modification times are
//! carried over.

use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::error::{io_err, SyncError};
use crate::hash;

// ---------------------------------------------------------------------------
// Copy outcome
// ---------------------------------------------------------------------------

/// Outcome of an individual model copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Destination did not exist; file was copied.
    Copied,
    /// Destination differed and `overwrite` was set; file was replaced.
    Overwritten,
    /// `--dry-run`: the file *would* have been copied.
    WouldCopy,
    /// `--dry-run`: the file *would* have been overwritten.
    WouldOverwrite,
    /// Destination already has identical content.
    UpToDate,
    /// Destination differs and `overwrite` was not set.
    SkippedDiffers,
}

impl CopyOutcome {
    /// Whether this outcome counts as a sync for the manifest.
    pub fn copied(self) -> bool {
        matches!(
            self,
            Self::Copied | Self::Overwritten | Self::WouldCopy | Self::WouldOverwrite
        )
    }
}

// ---------------------------------------------------------------------------
// resolve_and_copy
// ---------------------------------------------------------------------------

/// Copy `source` to `dest` subject to the identity and overwrite rules.
pub fn resolve_and_copy(
    source: &Path,
    dest: &Path,
    overwrite: bool,
    dry_run: bool,
) -> Result<CopyOutcome, SyncError> {
    let tmp = PathBuf::from(format!("{}.modelsync.tmp", dest.display()));
    resolve_and_copy_with_tmp(source, dest, overwrite, dry_run, &tmp)
}

fn resolve_and_copy_with_tmp(
    source: &Path,
    dest: &Path,
    overwrite: bool,
    dry_run: bool,
    tmp: &Path,
) -> Result<CopyOutcome, SyncError> {
    let exists = dest.exists();
    if exists {
        if hash::files_identical(source, dest) {
            tracing::debug!("up to date: {}", dest.display());
            return Ok(CopyOutcome::UpToDate);
        }
        if !overwrite {
            tracing::debug!("differs, not overwriting: {}", dest.display());
            return Ok(CopyOutcome::SkippedDiffers);
        }
    }

    if dry_run {
        tracing::info!("[dry-run] would copy: {} -> {}", source.display(), dest.display());
        return Ok(if exists {
            CopyOutcome::WouldOverwrite
        } else {
            CopyOutcome::WouldCopy
        });
    }

    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }

    let meta = std::fs::metadata(source).map_err(|e| io_err(source, e))?;
    std::fs::copy(source, tmp).map_err(|e| {
        let _ = std::fs::remove_file(tmp);
        io_err(source, e)
    })?;
    let atime = FileTime::from_last_access_time(&meta);
    let mtime = FileTime::from_last_modification_time(&meta);
    if let Err(e) = filetime::set_file_times(tmp, atime, mtime) {
        tracing::debug!("could not carry file times to {}: {e}", tmp.display());
    }

    if let Err(e) = std::fs::rename(tmp, dest) {
        let _ = std::fs::remove_file(tmp);
        return Err(io_err(dest, e));
    }

    tracing::info!("copied: {} -> {}", source.display(), dest.display());
    Ok(if exists {
        CopyOutcome::Overwritten
    } else {
        CopyOutcome::Copied
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
