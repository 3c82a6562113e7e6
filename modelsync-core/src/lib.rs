//! modelsync core library — domain types, manifest persistence, errors.
//!
//! - [`types`] — category newtype and manifest entry
//! - [`error`] — [`ManifestError`]
//! - [`manifest`] — the `best_models.json` document: load / save / upsert

pub mod error;
pub mod manifest;
pub mod types;

pub use error::ManifestError;
pub use manifest::{InvalidEntry, Manifest, MANIFEST_FILENAME};
pub use types::{CategoryName, ManifestEntry};
