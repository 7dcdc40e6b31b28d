//! Shared frontend systems file
//!
//! A plain text file with one `key: value` line per platform. Several
//! installers write to it, so updates touch only the line for their key.

use camino::{Utf8Path, Utf8PathBuf};
use emuboot_core::{EnsureOutcome, Error, Result, SystemEntry};
use regex::{NoExpand, Regex};
use std::fs;
use std::io;
use tracing::{debug, info};

/// The systems file of a frontend
pub struct SystemsRegistry {
    path: Utf8PathBuf,
}

impl SystemsRegistry {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Make the file contain exactly one correct line for `entry`
    ///
    /// The file is only rewritten when its content changes.
    pub fn upsert(&self, entry: &SystemEntry) -> Result<EnsureOutcome> {
        let current = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(Error::fs("read", &self.path, e)),
        };

        let updated = upsert_line(&current, &entry.key, &entry.name)?;
        if updated == current {
            debug!("{} already lists {}", self.path, entry.key);
            return Ok(EnsureOutcome::Present);
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs("create directory", parent, e))?;
        }
        fs::write(&self.path, updated).map_err(|e| Error::fs("write", &self.path, e))?;

        info!("Registered {}: {} in {}", entry.key, entry.name, self.path);
        Ok(EnsureOutcome::Created)
    }
}

/// Rewrite `content` so it holds a single `key: value` line
///
/// When no line for `key` exists a blank `key: ` placeholder is appended
/// first; the first line for `key` is then substituted with the wanted value
/// and later lines for the same key are dropped.
pub fn upsert_line(content: &str, key: &str, value: &str) -> Result<String> {
    let pattern = Regex::new(&format!(r"^\s*{}\s*:.*$", regex::escape(key)))
        .map_err(|e| Error::invalid_config(format!("Invalid system key '{}': {}", key, e)))?;

    let placeholder = format!("{}: ", key);
    let mut lines: Vec<&str> = content.lines().collect();
    if !lines.iter().any(|line| pattern.is_match(line)) {
        lines.push(&placeholder);
    }

    let wanted = format!("{}: {}", key, value);
    let mut seen = false;
    let mut out = String::with_capacity(content.len() + wanted.len() + 1);
    for line in lines {
        if pattern.is_match(line) {
            if seen {
                continue;
            }
            seen = true;
            out.push_str(&pattern.replace(line, NoExpand(&wanted)));
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    Ok(out)
}
