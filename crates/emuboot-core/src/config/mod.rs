//! Configuration for a provisioning run
//!
//! [`Settings`] mirrors the layered YAML document (embedded defaults, user
//! file, environment). [`SetupConfig`] is the resolved, immutable form that
//! every stage receives: absolute paths, the package descriptor and the
//! registry coordinates.

mod loader;

pub use loader::{ConfigLoader, ConfigOverrides};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{AssetFilter, PackageDescriptor, SystemEntry};

/// Default configuration file name inside the package config directory
pub const PACKAGE_CONFIG_FILE: &str = "Config.json";

/// Layered settings document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Settings {
    pub package: PackageSettings,
    pub registry: RegistrySettings,
    pub system: SystemEntry,
    pub paths: PathSettings,
    pub network: NetworkSettings,
}

impl Settings {
    /// Built-in settings without any user file or environment applied
    pub fn embedded() -> Result<Self> {
        let value = loader::embedded_defaults()?;
        Ok(serde_yaml_ng::from_value(value)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PackageSettings {
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub category: String,
    pub entrypoint: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RegistrySettings {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
    pub asset_prefix: String,
    pub asset_suffix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PathSettings {
    pub emulation_root: Option<Utf8PathBuf>,
    pub systems_file: Utf8PathBuf,
    pub catalog_file: Utf8PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct NetworkSettings {
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

/// Release registry coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryConfig {
    pub api_url: String,
    pub owner: String,
    pub repo: String,
}

impl RegistryConfig {
    /// Endpoint for the latest release
    pub fn latest_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo
        )
    }

    /// Endpoint for a release by tag
    pub fn tag_url(&self, tag: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases/tags/{}",
            self.api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            tag
        )
    }
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkConfig {
    pub http_timeout_secs: u64,
    pub user_agent: String,
}

/// Resolved configuration handed to every stage
#[derive(Debug, Clone, Serialize)]
pub struct SetupConfig {
    user_home: Utf8PathBuf,
    emulation_root: Utf8PathBuf,
    package: PackageDescriptor,
    registry: RegistryConfig,
    asset_filter: AssetFilter,
    system: SystemEntry,
    network: NetworkConfig,
    systems_file: Utf8PathBuf,
    catalog_file: Utf8PathBuf,
}

impl SetupConfig {
    /// Resolve settings against a user home and an optional emulation root
    ///
    /// `emulation_root` falls back to `settings.paths.emulation_root`, then to
    /// `<user_home>/Emulation`. Both roots must be absolute.
    pub fn from_settings(
        settings: Settings,
        user_home: Utf8PathBuf,
        emulation_root: Option<Utf8PathBuf>,
    ) -> Result<Self> {
        require_absolute("user home", &user_home)?;

        let emulation_root = emulation_root
            .or(settings.paths.emulation_root)
            .unwrap_or_else(|| user_home.join("Emulation"));
        require_absolute("emulation root", &emulation_root)?;

        if settings.package.name.trim().is_empty() {
            return Err(Error::invalid_config("package.name must not be empty"));
        }
        if settings.package.entrypoint.is_absolute() {
            return Err(Error::invalid_config(
                "package.entrypoint must be relative to the install directory",
            ));
        }

        let package = PackageDescriptor {
            executable_path: user_home
                .join(".local/bin")
                .join(&settings.package.name),
            name: settings.package.name,
            description: settings.package.description,
            icon_url: settings.package.icon_url,
            entrypoint: settings.package.entrypoint,
            category: settings.package.category,
        };

        let systems_file = emulation_root.join(&settings.paths.systems_file);
        let catalog_file = user_home.join(&settings.paths.catalog_file);

        Ok(Self {
            registry: RegistryConfig {
                api_url: settings.registry.api_url,
                owner: settings.registry.owner,
                repo: settings.registry.repo,
            },
            asset_filter: AssetFilter::new(
                settings.registry.asset_prefix,
                settings.registry.asset_suffix,
            ),
            system: settings.system,
            network: NetworkConfig {
                http_timeout_secs: settings.network.http_timeout_secs,
                user_agent: settings.network.user_agent,
            },
            user_home,
            emulation_root,
            package,
            systems_file,
            catalog_file,
        })
    }

    pub fn user_home(&self) -> &Utf8Path {
        &self.user_home
    }

    pub fn emulation_root(&self) -> &Utf8Path {
        &self.emulation_root
    }

    pub fn package(&self) -> &PackageDescriptor {
        &self.package
    }

    pub fn registry(&self) -> &RegistryConfig {
        &self.registry
    }

    pub fn asset_filter(&self) -> &AssetFilter {
        &self.asset_filter
    }

    pub fn system(&self) -> &SystemEntry {
        &self.system
    }

    pub fn network(&self) -> &NetworkConfig {
        &self.network
    }

    /// Shared frontend systems file
    pub fn systems_file(&self) -> &Utf8Path {
        &self.systems_file
    }

    /// Installed-version catalog file
    pub fn catalog_file(&self) -> &Utf8Path {
        &self.catalog_file
    }

    /// `~/.local/share/<package>`
    pub fn install_dir(&self) -> Utf8PathBuf {
        self.user_home.join(".local/share").join(self.package.key())
    }

    /// Extracted entrypoint the executable symlink points at
    pub fn entrypoint_path(&self) -> Utf8PathBuf {
        self.install_dir().join(&self.package.entrypoint)
    }

    /// `~/.config/<Package>`
    pub fn config_dir(&self) -> Utf8PathBuf {
        self.user_home.join(".config").join(&self.package.name)
    }

    /// `~/.config/<Package>/Config.json`
    pub fn config_file(&self) -> Utf8PathBuf {
        self.config_dir().join(PACKAGE_CONFIG_FILE)
    }

    /// `~/.local/share/applications/<package>.desktop`
    pub fn desktop_entry_path(&self) -> Utf8PathBuf {
        self.user_home
            .join(".local/share/applications")
            .join(format!("{}.desktop", self.package.key()))
    }

    /// Cached menu icon
    pub fn icon_path(&self) -> Utf8PathBuf {
        self.user_home
            .join(".cache/emuboot/icons")
            .join(format!("{}.png", self.package.key()))
    }

    /// `<emulation>/bios/<package>`
    pub fn bios_dir(&self) -> Utf8PathBuf {
        self.emulation_root.join("bios").join(self.package.key())
    }

    /// `<emulation>/storage/<package>`
    pub fn storage_dir(&self) -> Utf8PathBuf {
        self.emulation_root.join("storage").join(self.package.key())
    }

    /// `<emulation>/roms/<system>`
    pub fn roms_dir(&self) -> Utf8PathBuf {
        self.emulation_root.join("roms").join(&self.system.key)
    }
}

fn require_absolute(what: &str, path: &Utf8Path) -> Result<()> {
    if path.is_absolute() {
        Ok(())
    } else {
        Err(Error::invalid_config(format!(
            "{} must be an absolute path, got '{}'",
            what, path
        )))
    }
}
