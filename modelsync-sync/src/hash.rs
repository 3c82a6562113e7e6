//! Content identity for model files.
//!
//! Two files are the same model iff their SHA-256 digests match. Paths,
//! mtimes and permissions play no part.

use std::fs::File;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{io_err, SyncError};

/// Hex-encoded SHA-256 of the file at `path`, streamed.
pub fn file_digest(path: &Path) -> Result<String, SyncError> {
    let mut file = File::open(path).map_err(|e| io_err(path, e))?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher).map_err(|e| io_err(path, e))?;
    Ok(hex::encode(hasher.finalize()))
}

/// `true` when `dst` exists and has the same content as `src`.
///
/// A hashing failure on either side counts as "not identical"; the caller's
/// overwrite gate then decides what happens to the file.
pub fn files_identical(src: &Path, dst: &Path) -> bool {
    if !dst.exists() {
        return false;
    }
    match (file_digest(src), file_digest(dst)) {
        (Ok(a), Ok(b)) => a == b,
        (Err(e), _) | (_, Err(e)) => {
            tracing::warn!("cannot compare {} with {}: {e}", src.display(), dst.display());
            false
        }
    }
}
