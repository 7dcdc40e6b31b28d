//! Idempotent versioned-package installer
//!
//! A package is reinstalled when its executable is missing or the catalog
//! records a different version than the release being installed. Versions
//! are compared as opaque strings, so a registry-side downgrade is installed
//! like any other change.

use camino::Utf8Path;
use emuboot_core::{Error, PackageDescriptor, ReleaseMetadata, Result, SetupConfig, VersionStore};
use emuboot_release::{Archive, Fetcher};
use serde::Serialize;
use std::fs;
use tracing::{debug, info};

use crate::fsutil::replace_symlink;

/// Why an install is needed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallReason {
    /// The executable path does not exist
    ExecutableMissing,
    /// The catalog has no entry or a different version
    VersionChanged,
}

/// What `install` would do for a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum InstallDecision {
    Skip {
        version: String,
    },
    Install {
        previous: Option<String>,
        version: String,
        reason: InstallReason,
    },
}

/// Outcome of `install`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstallResult {
    AlreadyInstalled {
        version: String,
    },
    Installed {
        previous: Option<String>,
        version: String,
    },
}

impl InstallResult {
    pub fn version(&self) -> &str {
        match self {
            Self::AlreadyInstalled { version } | Self::Installed { version, .. } => version,
        }
    }
}

/// Skip iff the executable exists and the installed version equals `tag`
pub fn decide(installed: Option<String>, executable_present: bool, tag: &str) -> InstallDecision {
    if executable_present && installed.as_deref() == Some(tag) {
        return InstallDecision::Skip {
            version: tag.to_string(),
        };
    }

    let reason = if executable_present {
        InstallReason::VersionChanged
    } else {
        InstallReason::ExecutableMissing
    };
    InstallDecision::Install {
        previous: installed,
        version: tag.to_string(),
        reason,
    }
}

/// Downloads, extracts and publishes the configured package
pub struct Installer<'a> {
    config: &'a SetupConfig,
    fetcher: &'a dyn Fetcher,
    archive: &'a dyn Archive,
    store: &'a dyn VersionStore,
}

impl<'a> Installer<'a> {
    pub fn new(
        config: &'a SetupConfig,
        fetcher: &'a dyn Fetcher,
        archive: &'a dyn Archive,
        store: &'a dyn VersionStore,
    ) -> Self {
        Self {
            config,
            fetcher,
            archive,
            store,
        }
    }

    fn package(&self) -> &PackageDescriptor {
        self.config.package()
    }

    /// Decide whether `release` needs installing
    pub fn plan(&self, release: &ReleaseMetadata) -> Result<InstallDecision> {
        let package = self.package();
        let installed = self.store.get(&package.key())?;
        let executable_present = package.executable_path.exists();

        debug!(
            "{}: installed={:?} latest={} executable_present={}",
            package.name, installed, release.tag, executable_present
        );

        Ok(decide(installed, executable_present, &release.tag))
    }

    /// Install `release` unless it is already in place
    ///
    /// Any failure aborts the install as-is: nothing downloaded or extracted
    /// so far is cleaned up, and the catalog is only updated at the end.
    pub async fn install(&self, release: &ReleaseMetadata) -> Result<InstallResult> {
        let previous = match self.plan(release)? {
            InstallDecision::Skip { version } => {
                info!("{} {} is already installed", self.package().name, version);
                return Ok(InstallResult::AlreadyInstalled { version });
            }
            InstallDecision::Install { previous, .. } => previous,
        };

        let package = self.package();
        info!(
            "Installing {} {} (currently {})",
            package.name,
            release.tag,
            previous.as_deref().unwrap_or("not installed")
        );

        let install_dir = self.config.install_dir();
        prepare_install_dir(&install_dir)?;

        let archive_path = install_dir.join(&release.asset_name);
        self.fetcher
            .fetch_to_file(&release.download_url, &archive_path)
            .await?;

        self.archive.extract(&archive_path, &install_dir)?;
        fs::remove_file(&archive_path).map_err(|e| Error::fs("remove", &archive_path, e))?;

        let entrypoint = self.config.entrypoint_path();
        if !entrypoint.is_file() {
            return Err(Error::extraction_failed(
                archive_path.as_str(),
                format!("entrypoint {} not found in archive", package.entrypoint),
            ));
        }
        replace_symlink(&entrypoint, &package.executable_path)?;

        self.store.set(&package.key(), &release.tag)?;

        info!(
            "Installed {} {} -> {}",
            package.name, release.tag, package.executable_path
        );
        Ok(InstallResult::Installed {
            previous,
            version: release.tag.clone(),
        })
    }
}

/// Create the install directory and confirm it can be worked in
fn prepare_install_dir(path: &Utf8Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| Error::install_dir_unavailable(path.as_str(), e))?;
    fs::read_dir(path).map_err(|e| Error::install_dir_unavailable(path.as_str(), e))?;
    Ok(())
}
