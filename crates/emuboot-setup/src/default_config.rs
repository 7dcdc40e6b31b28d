//! First-run package configuration

use emuboot_core::{EnsureOutcome, Error, Result, SetupConfig};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use tracing::{debug, info};

use crate::templates::TemplateRegistry;

/// Writes the package's default Config.json when none exists
pub struct DefaultConfig<'a> {
    config: &'a SetupConfig,
    templates: &'a TemplateRegistry,
}

impl<'a> DefaultConfig<'a> {
    pub fn new(config: &'a SetupConfig, templates: &'a TemplateRegistry) -> Self {
        Self { config, templates }
    }

    /// Write the default document unless something already occupies the path
    ///
    /// Existence is the only gate: the document is never compared or merged.
    pub fn ensure(&self) -> Result<EnsureOutcome> {
        let path = self.config.config_file();
        if fs::symlink_metadata(&path).is_ok() {
            debug!("{} already exists, leaving it untouched", path);
            return Ok(EnsureOutcome::Present);
        }

        let content = self.templates.render_package_config(self.config)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs("create directory", parent, e))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Ok(EnsureOutcome::Present);
            }
            Err(e) => return Err(Error::fs("create", &path, e)),
        };
        file.write_all(content.as_bytes())
            .map_err(|e| Error::fs("write", &path, e))?;

        info!("Wrote default configuration {}", path);
        Ok(EnsureOutcome::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use emuboot_core::Settings;
    use tempfile::TempDir;

    fn config_in(temp: &TempDir) -> SetupConfig {
        let home = Utf8PathBuf::from_path_buf(temp.path().join("home")).unwrap();
        SetupConfig::from_settings(Settings::embedded().unwrap(), home, None).unwrap()
    }

    #[test]
    fn test_writes_when_absent() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let templates = TemplateRegistry::new().unwrap();

        let outcome = DefaultConfig::new(&config, &templates).ensure().unwrap();

        assert_eq!(outcome, EnsureOutcome::Created);
        let content = fs::read_to_string(config.config_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert!(value.get("version").is_some());
    }

    #[test]
    fn test_existing_content_untouched() {
        let temp = TempDir::new().unwrap();
        let config = config_in(&temp);
        let templates = TemplateRegistry::new().unwrap();
        fs::create_dir_all(config.config_dir()).unwrap();
        fs::write(config.config_file(), "{\"custom\": true}").unwrap();

        let outcome = DefaultConfig::new(&config, &templates).ensure().unwrap();

        assert_eq!(outcome, EnsureOutcome::Present);
        assert_eq!(
            fs::read_to_string(config.config_file()).unwrap(),
            "{\"custom\": true}"
        );
    }
}
