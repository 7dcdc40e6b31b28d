//! Setup stages for emuboot
//!
//! Provides:
//! - The idempotent package [`Installer`]
//! - Emulation storage scaffolding ([`Scaffold`])
//! - First-run package configuration ([`DefaultConfig`])
//! - The shared frontend systems file ([`SystemsRegistry`])
//! - The desktop menu entry ([`MenuEntry`])
//! - The [`Pipeline`] running all of them in order

pub mod default_config;
pub mod fsutil;
pub mod installer;
pub mod menu;
pub mod pipeline;
pub mod scaffold;
pub mod systems;
pub mod templates;

pub use default_config::DefaultConfig;
pub use installer::{decide, InstallDecision, InstallReason, InstallResult, Installer};
pub use menu::MenuEntry;
pub use pipeline::{materialize, MaterializeSummary, Pipeline, RunSummary};
pub use scaffold::{Scaffold, ScaffoldEntry, STORAGE_DIRS};
pub use systems::SystemsRegistry;
pub use templates::TemplateRegistry;
