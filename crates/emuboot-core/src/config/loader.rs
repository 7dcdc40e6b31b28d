//! Hierarchical configuration loader with precedence
//!
//! Loads configuration from multiple sources with the following precedence (low to high):
//! 1. Embedded defaults (built into binary)
//! 2. User file (--config, or $XDG_CONFIG_HOME/emuboot/emuboot.yaml)
//! 3. Environment variables (USER_HOME, EMULATION_ROOT, EMUBOOT_* prefix)
//! 4. CLI flags (passed in as [`ConfigOverrides`])

use camino::{Utf8Path, Utf8PathBuf};
use rust_embed::RustEmbed;
use serde_yaml_ng::Value;
use std::env;
use std::fs;
use tracing::debug;

use super::{Settings, SetupConfig};
use crate::error::{Error, Result};

/// Embedded configuration files
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/embedded/"]
struct EmbeddedConfigs;

const DEFAULTS_FILE: &str = "defaults.yaml";

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub user_home: Option<Utf8PathBuf>,
    pub emulation_root: Option<Utf8PathBuf>,
}

/// Configuration hierarchy loader
pub struct ConfigLoader {
    /// User settings file
    config_file: Option<Utf8PathBuf>,

    /// Whether a missing `config_file` is an error
    explicit: bool,
}

impl ConfigLoader {
    /// Loader reading the default user file when it exists
    pub fn new() -> Self {
        let config_file = dirs::config_dir()
            .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
            .map(|dir| dir.join("emuboot").join("emuboot.yaml"));
        Self {
            config_file,
            explicit: false,
        }
    }

    /// Loader reading a specific user file, which must exist
    pub fn with_file(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            config_file: Some(path.into()),
            explicit: true,
        }
    }

    /// Loader using embedded defaults and environment only
    pub fn defaults_only() -> Self {
        Self {
            config_file: None,
            explicit: false,
        }
    }

    /// Load the layered settings document
    pub fn load_settings(&self) -> Result<Settings> {
        let mut document = embedded_defaults()?;

        if let Some(path) = &self.config_file {
            if path.exists() {
                debug!("Loading settings from {}", path);
                merge_yaml(&mut document, self.load_yaml_file(path)?);
            } else if self.explicit {
                return Err(Error::invalid_config(format!(
                    "Configuration file not found: {}",
                    path
                )));
            }
        }

        let settings: Settings = serde_yaml_ng::from_value(document)
            .map_err(|e| Error::invalid_config(format!("Failed to parse settings: {}", e)))?;

        apply_env_overrides(settings)
    }

    /// Load settings and resolve them into a [`SetupConfig`]
    ///
    /// Fails with [`Error::RequiredVariableUnset`] when no user home is
    /// available, before anything touches the network or the filesystem.
    pub fn resolve(&self, overrides: &ConfigOverrides) -> Result<SetupConfig> {
        let user_home = match &overrides.user_home {
            Some(home) => non_empty("--user-home", home.clone())?,
            None => required_env_path("USER_HOME")?,
        };

        let emulation_root = match &overrides.emulation_root {
            Some(root) => Some(non_empty("--emulation-root", root.clone())?),
            None => optional_env_path("EMULATION_ROOT")?,
        };

        let settings = self.load_settings()?;
        SetupConfig::from_settings(settings, user_home, emulation_root)
    }

    /// Load a YAML file and parse it
    fn load_yaml_file(&self, path: &Utf8Path) -> Result<Value> {
        let content = fs::read_to_string(path).map_err(|e| Error::fs("read", path, e))?;
        serde_yaml_ng::from_str(&content)
            .map_err(|e| Error::invalid_config(format!("Failed to parse {}: {}", path, e)))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the embedded defaults document
pub(super) fn embedded_defaults() -> Result<Value> {
    let embedded_file = EmbeddedConfigs::get(DEFAULTS_FILE).ok_or_else(|| {
        Error::invalid_config(format!("Embedded config not found: {}", DEFAULTS_FILE))
    })?;

    let content = std::str::from_utf8(&embedded_file.data).map_err(|_| {
        Error::invalid_config(format!("Invalid UTF-8 in embedded config: {}", DEFAULTS_FILE))
    })?;

    Ok(serde_yaml_ng::from_str(content)?)
}

/// Merge `overlay` into `base`, mapping by mapping
///
/// A null overlay leaves the base untouched so an empty user file is harmless.
fn merge_yaml(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) if !value.is_null() => merge_yaml(existing, value),
                    Some(existing) => *existing = Value::Null,
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Apply EMUBOOT_* environment overrides
fn apply_env_overrides(mut settings: Settings) -> Result<Settings> {
    if let Ok(val) = env::var("EMUBOOT_GITHUB_API_URL") {
        settings.registry.api_url = val;
    }

    if let Ok(val) = env::var("EMUBOOT_HTTP_TIMEOUT_SECS") {
        settings.network.http_timeout_secs = val.parse().map_err(|_| {
            Error::invalid_config("EMUBOOT_HTTP_TIMEOUT_SECS must be a valid number")
        })?;
    }

    if let Ok(val) = env::var("EMUBOOT_USER_AGENT") {
        settings.network.user_agent = val;
    }

    Ok(settings)
}

fn required_env_path(name: &str) -> Result<Utf8PathBuf> {
    optional_env_path(name)?.ok_or_else(|| Error::required_variable(name))
}

fn optional_env_path(name: &str) -> Result<Option<Utf8PathBuf>> {
    match env::var(name) {
        Ok(value) => non_empty(name, Utf8PathBuf::from(value)).map(Some),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(Error::invalid_config(format!(
            "{} is not valid UTF-8",
            name
        ))),
    }
}

fn non_empty(name: &str, path: Utf8PathBuf) -> Result<Utf8PathBuf> {
    if path.as_str().trim().is_empty() {
        Err(Error::required_variable(name))
    } else {
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn clear_env() {
        for name in [
            "USER_HOME",
            "EMULATION_ROOT",
            "EMUBOOT_GITHUB_API_URL",
            "EMUBOOT_HTTP_TIMEOUT_SECS",
            "EMUBOOT_USER_AGENT",
        ] {
            env::remove_var(name);
        }
    }

    fn write_settings(content: &str) -> (TempDir, Utf8PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = Utf8PathBuf::from_path_buf(temp.path().join("emuboot.yaml")).unwrap();
        fs::write(&path, content).unwrap();
        (temp, path)
    }

    #[test]
    #[serial]
    fn test_missing_user_home_is_required_variable_error() {
        clear_env();
        let result = ConfigLoader::defaults_only().resolve(&ConfigOverrides::default());
        match result {
            Err(Error::RequiredVariableUnset { name }) => assert_eq!(name, "USER_HOME"),
            other => panic!("expected RequiredVariableUnset, got {:?}", other),
        }
    }

    #[test]
    #[serial]
    fn test_empty_user_home_is_rejected() {
        clear_env();
        env::set_var("USER_HOME", "");
        let result = ConfigLoader::defaults_only().resolve(&ConfigOverrides::default());
        assert!(matches!(result, Err(Error::RequiredVariableUnset { .. })));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_user_home_from_env() {
        clear_env();
        env::set_var("USER_HOME", "/home/default");
        env::set_var("EMULATION_ROOT", "/mnt/games/Emulation");
        let config = ConfigLoader::defaults_only()
            .resolve(&ConfigOverrides::default())
            .unwrap();
        assert_eq!(config.user_home(), "/home/default");
        assert_eq!(config.emulation_root(), "/mnt/games/Emulation");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_cli_overrides_take_precedence() {
        clear_env();
        env::set_var("USER_HOME", "/home/env");
        let overrides = ConfigOverrides {
            user_home: Some("/home/flag".into()),
            emulation_root: Some("/srv/Emulation".into()),
        };
        let config = ConfigLoader::defaults_only().resolve(&overrides).unwrap();
        assert_eq!(config.user_home(), "/home/flag");
        assert_eq!(config.emulation_root(), "/srv/Emulation");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_user_file_merges_over_defaults() {
        clear_env();
        let (_temp, path) = write_settings(
            r#"
registry:
  owner: "custom-owner"
system:
  name: "Switch"
"#,
        );
        let settings = ConfigLoader::with_file(path).load_settings().unwrap();
        assert_eq!(settings.registry.owner, "custom-owner");
        assert_eq!(settings.registry.repo, "Stable-Releases");
        assert_eq!(settings.system.key, "switch");
        assert_eq!(settings.system.name, "Switch");
    }

    #[test]
    #[serial]
    fn test_empty_user_file_keeps_defaults() {
        clear_env();
        let (_temp, path) = write_settings("");
        let settings = ConfigLoader::with_file(path).load_settings().unwrap();
        assert_eq!(settings.package.name, "Ryujinx");
    }

    #[test]
    #[serial]
    fn test_explicit_missing_file_is_error() {
        clear_env();
        let result = ConfigLoader::with_file("/nonexistent/emuboot.yaml").load_settings();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("EMUBOOT_GITHUB_API_URL", "http://127.0.0.1:9999");
        env::set_var("EMUBOOT_HTTP_TIMEOUT_SECS", "12");
        let settings = ConfigLoader::defaults_only().load_settings().unwrap();
        assert_eq!(settings.registry.api_url, "http://127.0.0.1:9999");
        assert_eq!(settings.network.http_timeout_secs, 12);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_timeout_env() {
        clear_env();
        env::set_var("EMUBOOT_HTTP_TIMEOUT_SECS", "soon");
        let result = ConfigLoader::defaults_only().load_settings();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
        clear_env();
    }
}
