//! # modelsync-sync
//!
//! Hash-gated model synchronisation between two models roots.
//!
//! Call [`pipeline::run`] for a full run, or the individual stages:
//! [`sync_best`] / [`sync_all`], [`update_destination_manifest`] and
//! [`cleanup()`]. Concurrent runs against one destination are not supported.

pub mod all;
pub mod best;
pub mod cleanup;
pub mod copier;
pub mod error;
pub mod hash;
pub mod layout;
pub mod pipeline;
pub mod report;
pub mod update;

pub use all::{sync_all, sync_all_with};
pub use best::sync_best;
pub use cleanup::{cleanup, cleanup_with_manifest, CleanupReport, CleanupSweep};
pub use copier::{resolve_and_copy, CopyOutcome};
pub use error::SyncError;
pub use pipeline::{RunReport, SyncConfig, SyncMode};
pub use report::{SyncEvent, SyncReport, SyncResult};
pub use update::{update_destination_manifest, ManifestChange, ManifestUpdate};
