//! Shared emulation storage layout
//!
//! Storage lives under the emulation root so several emulator installs can
//! share it; the package config directory and the bios tree link into it.

use camino::Utf8PathBuf;
use emuboot_core::{EnsureReport, Result, SetupConfig};
use tracing::info;

use crate::fsutil::{ensure_dir, ensure_symlink};

/// Real directories created under `<emulation>/storage/<package>`
pub const STORAGE_DIRS: [&str; 4] = ["bis", "profiles", "sdcard", "system"];

/// Storage directory holding the console keys
const KEYS_STORAGE_DIR: &str = "system";

/// One scaffolding entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldEntry {
    Dir(Utf8PathBuf),
    Link { target: Utf8PathBuf, link: Utf8PathBuf },
}

impl ScaffoldEntry {
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Dir(path) => path,
            Self::Link { link, .. } => link,
        }
    }
}

/// Directory and symlink scaffolding for one package
pub struct Scaffold<'a> {
    config: &'a SetupConfig,
}

impl<'a> Scaffold<'a> {
    pub fn new(config: &'a SetupConfig) -> Self {
        Self { config }
    }

    /// Entries in the order they are ensured
    pub fn plan(&self) -> Vec<ScaffoldEntry> {
        let storage = self.config.storage_dir();
        let config_dir = self.config.config_dir();
        let bios = self.config.bios_dir();

        let mut entries: Vec<ScaffoldEntry> = STORAGE_DIRS
            .iter()
            .map(|dir| ScaffoldEntry::Dir(storage.join(dir)))
            .collect();

        entries.push(ScaffoldEntry::Dir(bios.clone()));
        entries.push(ScaffoldEntry::Link {
            target: storage.join(KEYS_STORAGE_DIR),
            link: bios.join("keys"),
        });

        entries.push(ScaffoldEntry::Dir(config_dir.clone()));
        entries.extend(STORAGE_DIRS.iter().map(|dir| ScaffoldEntry::Link {
            target: storage.join(dir),
            link: config_dir.join(dir),
        }));

        entries.push(ScaffoldEntry::Dir(self.config.roms_dir()));
        entries
    }

    /// Ensure every entry exists, never overwriting foreign files
    pub fn ensure(&self) -> Result<Vec<EnsureReport>> {
        info!(
            "Ensuring {} storage layout under {}",
            self.config.package().name,
            self.config.emulation_root()
        );

        self.plan()
            .iter()
            .map(|entry| -> Result<EnsureReport> {
                let outcome = match entry {
                    ScaffoldEntry::Dir(path) => ensure_dir(path)?,
                    ScaffoldEntry::Link { target, link } => ensure_symlink(target, link)?,
                };
                Ok(EnsureReport::new(entry.path(), outcome))
            })
            .collect()
    }
}
