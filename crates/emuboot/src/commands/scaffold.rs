//! Scaffold command

use anyhow::{Context, Result};
use emuboot_core::SetupConfig;
use emuboot_setup::{materialize, TemplateRegistry};

use crate::output;

pub fn run(config: SetupConfig, quiet: bool) -> Result<()> {
    let templates = TemplateRegistry::new()?;
    let summary = materialize(&config, &templates)
        .with_context(|| format!("Failed to scaffold {}", config.package().name))?;

    if !quiet {
        output::header(&format!("{} layout", config.package().name));
        output::reports(&summary.scaffold);
        output::kv("Config.json", &output::outcome_label(summary.default_config));
        output::kv("systems entry", &output::outcome_label(summary.systems));
    }
    Ok(())
}
