//! The `best_models.json` manifest.
//!
//! # Storage layout
//!
//! ```text
//! <models_root>/
//!   best_models.json          (category -> best model entry)
//!   <category>/
//!     model_*.json            (model files)
//! ```
//!
//! The manifest is kept as raw JSON values. Typed access goes through
//! [`Manifest::entries`], which validates each entry on the way out, so a
//! malformed entry never blocks the others and survives a rewrite untouched.
//!
//! Writes use the atomic `.tmp` sibling + rename pattern. Concurrent writers
//! are not serialised: two runs against the same root can lose each other's
//! updates, but the file is never observed half-written.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{io_err, ManifestError};
use crate::types::{CategoryName, ManifestEntry};

/// File name of the manifest inside a models root.
pub const MANIFEST_FILENAME: &str = "best_models.json";

// ---------------------------------------------------------------------------
// 1. Types
// ---------------------------------------------------------------------------

/// Category -> best model mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: Map<String, Value>,
}

/// A manifest entry that is not a usable `{model_file: ...}` record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEntry {
    pub category: CategoryName,
    pub reason: String,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace the entry for `category`.
    pub fn upsert(&mut self, category: &CategoryName, entry: &ManifestEntry) -> Result<(), ManifestError> {
        let value = serde_json::to_value(entry)?;
        self.entries.insert(category.0.clone(), value);
        Ok(())
    }

    /// Typed entry for `category`, if present and well formed.
    pub fn get(&self, category: &CategoryName) -> Option<ManifestEntry> {
        self.entries
            .get(category.as_str())
            .and_then(|v| parse_entry(category, v).ok())
    }

    /// Every entry in category order, validated individually.
    pub fn entries(&self) -> Vec<(CategoryName, Result<ManifestEntry, InvalidEntry>)> {
        self.entries
            .iter()
            .map(|(key, value)| {
                let category = CategoryName::from(key.as_str());
                let parsed = parse_entry(&category, value);
                (category, parsed)
            })
            .collect()
    }

    /// `(category, model_file)` pairs currently designated best.
    ///
    /// Malformed entries protect nothing.
    pub fn best_files(&self) -> BTreeSet<(CategoryName, String)> {
        self.entries()
            .into_iter()
            .filter_map(|(category, entry)| entry.ok().map(|e| (category, e.model_file)))
            .collect()
    }
}

fn parse_entry(category: &CategoryName, value: &Value) -> Result<ManifestEntry, InvalidEntry> {
    let invalid = |reason: &str| InvalidEntry {
        category: category.clone(),
        reason: reason.to_string(),
    };
    let Some(object) = value.as_object() else {
        return Err(invalid("entry is not an object"));
    };
    let Some(model_file) = object.get("model_file") else {
        return Err(invalid("missing `model_file`"));
    };
    let Some(model_file) = model_file.as_str() else {
        return Err(invalid("`model_file` is not a string"));
    };

    let text = |key: &str| {
        object
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };
    let extra = object
        .iter()
        .filter(|(k, _)| !matches!(k.as_str(), "model_file" | "date" | "time"))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();

    Ok(ManifestEntry {
        model_file: model_file.to_string(),
        date: text("date"),
        time: text("time"),
        extra,
    })
}

// ---------------------------------------------------------------------------
// 2. Paths
// ---------------------------------------------------------------------------

/// `<root>/best_models.json` — pure, no I/O.
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_FILENAME)
}

/// `<root>/best_models.json.tmp` — the staging file for atomic saves.
pub fn tmp_path(root: &Path) -> PathBuf {
    root.join(format!("{MANIFEST_FILENAME}.tmp"))
}

// ---------------------------------------------------------------------------
// 3. Load / save
// ---------------------------------------------------------------------------

/// Load the manifest under `root`.
///
/// Returns `Ok(None)` if no manifest exists, `ManifestError::Parse` if the
/// document is not a JSON object.
pub fn load_at(root: &Path) -> Result<Option<Manifest>, ManifestError> {
    let path = manifest_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    let manifest = serde_json::from_str(&contents)
        .map_err(|source| ManifestError::Parse { path, source })?;
    Ok(Some(manifest))
}

/// Atomically save the manifest to `<root>/best_models.json`.
///
/// Write flow: serialize (2-space indent, trailing newline) → `.tmp` sibling
/// → `rename`. The `.tmp` is removed if the rename fails.
pub fn save_at(root: &Path, manifest: &Manifest) -> Result<(), ManifestError> {
    std::fs::create_dir_all(root).map_err(|e| io_err(root, e))?;
    let path = manifest_path(root);
    let tmp = tmp_path(root);

    let mut json = serde_json::to_string_pretty(manifest)?;
    json.push('\n');
    std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, &path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(&path, e));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
