//! Error types for modelsync-sync.

use std::path::PathBuf;

use thiserror::Error;

use modelsync_core::ManifestError;

/// All errors that can arise from sync operations.
///
/// Only [`SyncError::SourceNotFound`] and a failed destination manifest write
/// end a run; everything else is recorded per item and skipped.
#[derive(Debug, Error)]
pub enum SyncError {
    /// An error from manifest load/save.
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source models root does not exist.
    #[error("source models directory not found: {path}")]
    SourceNotFound { path: PathBuf },
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
