//! CLI command implementations

pub mod check;
pub mod run;
pub mod scaffold;
pub mod version;

use anyhow::{Context, Result};
use camino::Utf8Path;
use emuboot_core::{ConfigLoader, ConfigOverrides, SetupConfig};
use tracing::debug;

/// Resolve the layered configuration before any other work happens
pub fn load_config(
    config_file: Option<&Utf8Path>,
    overrides: &ConfigOverrides,
) -> Result<SetupConfig> {
    let loader = match config_file {
        Some(path) => ConfigLoader::with_file(path),
        None => ConfigLoader::new(),
    };
    let config = loader
        .resolve(overrides)
        .context("Failed to resolve configuration")?;

    debug!(
        "User home {}, emulation root {}",
        config.user_home(),
        config.emulation_root()
    );
    Ok(config)
}
