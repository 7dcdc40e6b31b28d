//! Provisioning pipeline
//!
//! Stages run strictly in order and the first failure aborts the run:
//! resolve, install, scaffold, default config, systems registry, menu entry.

use camino::Utf8PathBuf;
use emuboot_core::{EnsureOutcome, EnsureReport, ReleaseMetadata, Result, SetupConfig, VersionStore};
use emuboot_release::{Archive, Fetcher, ReleaseResolver, ReleaseSelector};
use serde::Serialize;
use tracing::info;

use crate::default_config::DefaultConfig;
use crate::installer::{InstallResult, Installer};
use crate::menu::MenuEntry;
use crate::scaffold::Scaffold;
use crate::systems::SystemsRegistry;
use crate::templates::TemplateRegistry;

/// What the materializer stages did
#[derive(Debug, Clone, Serialize)]
pub struct MaterializeSummary {
    pub scaffold: Vec<EnsureReport>,
    pub default_config: EnsureOutcome,
    pub systems: EnsureOutcome,
}

impl MaterializeSummary {
    pub fn count(&self, outcome: EnsureOutcome) -> usize {
        self.scaffold.iter().filter(|r| r.outcome == outcome).count()
    }
}

/// What a full run did
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub release: Option<ReleaseMetadata>,
    pub install: Option<InstallResult>,
    pub executable: Utf8PathBuf,
    pub materialized: MaterializeSummary,
    pub menu_entry: Utf8PathBuf,
}

/// Wires the stages together over injected collaborators
pub struct Pipeline<'a> {
    config: &'a SetupConfig,
    resolver: &'a dyn ReleaseResolver,
    fetcher: &'a dyn Fetcher,
    archive: &'a dyn Archive,
    store: &'a dyn VersionStore,
    templates: TemplateRegistry,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a SetupConfig,
        resolver: &'a dyn ReleaseResolver,
        fetcher: &'a dyn Fetcher,
        archive: &'a dyn Archive,
        store: &'a dyn VersionStore,
    ) -> Result<Self> {
        Ok(Self {
            config,
            resolver,
            fetcher,
            archive,
            store,
            templates: TemplateRegistry::new()?,
        })
    }

    pub fn installer(&self) -> Installer<'_> {
        Installer::new(self.config, self.fetcher, self.archive, self.store)
    }

    /// Resolve the release `selector` names for the configured package
    pub async fn resolve(&self, selector: &ReleaseSelector) -> Result<ReleaseMetadata> {
        info!("Resolving {} release", self.config.package().name);
        self.resolver
            .resolve(selector, self.config.asset_filter())
            .await
    }

    /// Run every stage; with `skip_install` the registry is never contacted
    pub async fn run(&self, selector: &ReleaseSelector, skip_install: bool) -> Result<RunSummary> {
        let (release, install) = if skip_install {
            info!("Skipping install stage");
            (None, None)
        } else {
            let release = self.resolve(selector).await?;
            let install = self.installer().install(&release).await?;
            (Some(release), Some(install))
        };

        let materialized = self.materialize()?;
        let menu_entry = self.refresh_menu().await?;

        Ok(RunSummary {
            release,
            install,
            executable: self.config.package().executable_path.clone(),
            materialized,
            menu_entry,
        })
    }

    pub fn materialize(&self) -> Result<MaterializeSummary> {
        materialize(self.config, &self.templates)
    }

    pub async fn refresh_menu(&self) -> Result<Utf8PathBuf> {
        MenuEntry::new(self.config, &self.templates, self.fetcher)
            .refresh()
            .await
    }
}

/// Scaffolding, default config and systems registry; no network
pub fn materialize(
    config: &SetupConfig,
    templates: &TemplateRegistry,
) -> Result<MaterializeSummary> {
    let scaffold = Scaffold::new(config).ensure()?;
    let default_config = DefaultConfig::new(config, templates).ensure()?;
    let systems = SystemsRegistry::new(config.systems_file()).upsert(config.system())?;

    Ok(MaterializeSummary {
        scaffold,
        default_config,
        systems,
    })
}
