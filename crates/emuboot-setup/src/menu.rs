//! Desktop menu entry

use camino::Utf8PathBuf;
use emuboot_core::{Error, Result, SetupConfig};
use emuboot_release::Fetcher;
use std::fs;
use std::io;
use tracing::{debug, info};

use crate::templates::TemplateRegistry;

/// Registers the package in the desktop menu
pub struct MenuEntry<'a> {
    config: &'a SetupConfig,
    templates: &'a TemplateRegistry,
    fetcher: &'a dyn Fetcher,
}

impl<'a> MenuEntry<'a> {
    pub fn new(
        config: &'a SetupConfig,
        templates: &'a TemplateRegistry,
        fetcher: &'a dyn Fetcher,
    ) -> Self {
        Self {
            config,
            templates,
            fetcher,
        }
    }

    /// Regenerate the menu entry, deleting any stale one first
    ///
    /// The icon is downloaded only when it is not cached yet.
    pub async fn refresh(&self) -> Result<Utf8PathBuf> {
        let icon = self.config.icon_path();
        if !icon.exists() {
            if let Some(parent) = icon.parent() {
                fs::create_dir_all(parent)
                    .map_err(|e| Error::fs("create directory", parent, e))?;
            }
            debug!("Fetching menu icon {}", self.config.package().icon_url);
            self.fetcher
                .fetch_to_file(&self.config.package().icon_url, &icon)
                .await?;
        }

        let entry = self.config.desktop_entry_path();
        match fs::remove_file(&entry) {
            Ok(()) => debug!("Removed stale menu entry {}", entry),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(Error::fs("remove", &entry, e)),
        }

        let content = self.templates.render_desktop_entry(self.config, &icon)?;
        if let Some(parent) = entry.parent() {
            fs::create_dir_all(parent).map_err(|e| Error::fs("create directory", parent, e))?;
        }
        fs::write(&entry, content).map_err(|e| Error::fs("write", &entry, e))?;

        info!("Menu entry written to {}", entry);
        Ok(entry)
    }
}
