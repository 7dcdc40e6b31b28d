//! Shared data types passed between the resolver, installer and materializer

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// A package managed by emuboot
///
/// Built once from configuration at process start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    /// Display name, also used for the executable and config directory
    pub name: String,

    /// Human description shown in the menu entry
    pub description: String,

    /// Icon shown in the menu entry
    pub icon_url: String,

    /// Stable executable path (symlink to the extracted entrypoint)
    pub executable_path: Utf8PathBuf,

    /// Entrypoint inside the install directory
    pub entrypoint: Utf8PathBuf,

    /// Desktop menu category
    pub category: String,
}

impl PackageDescriptor {
    /// Lower-cased name used for catalog keys and directory names
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Release selected from the registry for installation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseMetadata {
    /// Release tag, compared verbatim against the catalog
    pub tag: String,

    /// Registry asset id
    pub asset_id: u64,

    /// Asset file name
    pub asset_name: String,

    /// Asset download URL
    pub download_url: String,
}

/// Asset name filter: `prefix*suffix`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFilter {
    pub prefix: String,
    pub suffix: String,
}

impl AssetFilter {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Whether an asset name satisfies the filter
    pub fn matches(&self, name: &str) -> bool {
        name.len() >= self.prefix.len() + self.suffix.len()
            && name.starts_with(&self.prefix)
            && name.ends_with(&self.suffix)
    }
}

/// Entry written to the shared frontend's systems file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemEntry {
    /// Platform key, e.g. `switch`
    pub key: String,

    /// Platform display name, e.g. `Nintendo Switch`
    pub name: String,
}

/// Outcome of a single idempotent filesystem step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnsureOutcome {
    /// The entry was created (or a stale symlink replaced)
    Created,
    /// The entry already existed in the wanted shape
    Present,
    /// A foreign file or directory occupies the path and was left alone
    Occupied,
}

/// One entry of a materializer run report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnsureReport {
    pub path: Utf8PathBuf,
    pub outcome: EnsureOutcome,
}

impl EnsureReport {
    pub fn new(path: &Utf8Path, outcome: EnsureOutcome) -> Self {
        Self {
            path: path.to_owned(),
            outcome,
        }
    }
}
