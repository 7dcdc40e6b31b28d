//! Tera templates for the files emuboot emits

use camino::Utf8Path;
use emuboot_core::{Error, Result, SetupConfig};
use tera::{Context, Tera};
use tracing::debug;

const PACKAGE_CONFIG: &str = "Config.json";
const DESKTOP_ENTRY: &str = "package.desktop";

/// Template registry for emitted files
pub struct TemplateRegistry {
    tera: Tera,
}

impl TemplateRegistry {
    /// Create a new template registry with embedded templates
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (PACKAGE_CONFIG, include_str!("templates/Config.json.tera")),
            (DESKTOP_ENTRY, include_str!("templates/package.desktop.tera")),
        ])
        .map_err(template_error)?;
        Ok(Self { tera })
    }

    /// Render the package's default Config.json
    pub fn render_package_config(&self, config: &SetupConfig) -> Result<String> {
        let mut context = Context::new();
        context.insert("game_dirs", &vec![config.roms_dir().to_string()]);

        debug!("Rendering {} template", PACKAGE_CONFIG);
        self.tera
            .render(PACKAGE_CONFIG, &context)
            .map_err(template_error)
    }

    /// Render the desktop menu entry
    pub fn render_desktop_entry(&self, config: &SetupConfig, icon: &Utf8Path) -> Result<String> {
        let package = config.package();
        let mut context = Context::new();
        context.insert("name", &package.name);
        context.insert("description", &package.description);
        context.insert("exec", package.executable_path.as_str());
        context.insert("icon", icon.as_str());
        context.insert("category", &package.category);

        debug!("Rendering {} template", DESKTOP_ENTRY);
        self.tera
            .render(DESKTOP_ENTRY, &context)
            .map_err(template_error)
    }
}

/// Flatten a tera error and its causes into one message
fn template_error(err: tera::Error) -> Error {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    Error::Template(message)
}
