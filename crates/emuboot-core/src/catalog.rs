//! Installed-version catalog
//!
//! One `name=version` line per package. Keys are lower-cased package names
//! and versions are opaque strings: equality is the only comparison ever
//! made against them.

use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::sync::Mutex;
use tracing::debug;

use crate::error::{Error, Result};

/// Key-value store of installed package versions
pub trait VersionStore: Send + Sync {
    /// Installed version for a package, if any
    fn get(&self, package: &str) -> Result<Option<String>>;

    /// Record the installed version for a package
    fn set(&self, package: &str, version: &str) -> Result<()>;
}

/// Catalog persisted as a plain text file
#[derive(Debug, Clone)]
pub struct FileVersionStore {
    path: Utf8PathBuf,
}

impl FileVersionStore {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content.lines().map(str::to_owned).collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(Error::fs("read", &self.path, e)),
        }
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let write_err = |source| Error::CatalogWrite {
            path: self.path.to_string(),
            source,
        };

        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_str().is_empty())
            .unwrap_or(Utf8Path::new("."));
        fs::create_dir_all(parent).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(write_err)?;
        for line in lines {
            writeln!(tmp, "{}", line).map_err(write_err)?;
        }
        // The temp file is created 0600; the catalog keeps its own mode
        let permissions = match fs::metadata(&self.path) {
            Ok(meta) => Some(meta.permissions()),
            Err(_) => default_permissions(),
        };
        if let Some(permissions) = permissions {
            tmp.as_file().set_permissions(permissions).map_err(write_err)?;
        }
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}

/// Mode for a newly created catalog: readable by other tooling
#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

/// Split a catalog line into its lower-cased key and value
fn parse_line(line: &str) -> Option<(String, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key.to_lowercase(), value.trim()))
}

impl VersionStore for FileVersionStore {
    fn get(&self, package: &str) -> Result<Option<String>> {
        let wanted = package.to_lowercase();
        let version = self
            .read_lines()?
            .iter()
            .filter_map(|line| parse_line(line))
            .find(|(key, _)| *key == wanted)
            .map(|(_, value)| value.to_string());
        debug!("Catalog lookup {} -> {:?}", wanted, version);
        Ok(version)
    }

    fn set(&self, package: &str, version: &str) -> Result<()> {
        let wanted = package.to_lowercase();
        let entry = format!("{}={}", wanted, version);

        let mut written = false;
        let mut lines = Vec::new();
        for line in self.read_lines()? {
            let is_key = parse_line(&line).is_some_and(|(key, _)| key == wanted);
            if !is_key {
                lines.push(line);
            } else if !written {
                lines.push(entry.clone());
                written = true;
            }
        }
        if !written {
            lines.push(entry);
        }

        debug!("Catalog update {} = {}", wanted, version);
        self.write_lines(&lines)
    }
}

/// Catalog held in memory, for dry runs and tests
#[derive(Debug, Default)]
pub struct InMemoryVersionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one entry
    pub fn with_entry(package: &str, version: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(package.to_lowercase(), version.to_string());
        store
    }
}

impl VersionStore for InMemoryVersionStore {
    fn get(&self, package: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(&package.to_lowercase()).cloned())
    }

    fn set(&self, package: &str, version: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(package.to_lowercase(), version.to_string());
        Ok(())
    }
}
