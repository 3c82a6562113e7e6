//! Domain types for model manifests.
//!
//! All types are serializable/deserializable via serde + serde_json.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// `strftime` pattern for [`ManifestEntry::date`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// `strftime` pattern for [`ManifestEntry::time`].
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A strongly-typed name for a model category (ruleset).
///
/// Each category owns a subdirectory `<models_root>/<category>/`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryName(pub String);

impl CategoryName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hidden categories (leading `.`) are never scanned.
    pub fn is_hidden(&self) -> bool {
        self.0.starts_with('.')
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CategoryName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CategoryName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Manifest entry
// ---------------------------------------------------------------------------

/// The best-model record for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// File name inside the category directory.
    pub model_file: String,
    /// `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,
    /// `HH:MM:SS`
    #[serde(default)]
    pub time: String,
    /// Fields written by other tools; carried through on rewrite.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ManifestEntry {
    /// Build an entry for `model_file` stamped with `now`.
    pub fn stamped(model_file: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            model_file: model_file.into(),
            date: now.format(DATE_FORMAT).to_string(),
            time: now.format(TIME_FORMAT).to_string(),
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
