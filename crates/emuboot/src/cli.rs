//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use emuboot_core::ConfigOverrides;
use emuboot_release::ReleaseSelector;

/// emuboot - Install and wire up emulator packages at container startup
#[derive(Parser, Debug)]
#[command(name = "emuboot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to emuboot.yaml config file
    #[arg(short, long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Home directory of the desktop user (default: $USER_HOME)
    #[arg(long, global = true)]
    pub user_home: Option<Utf8PathBuf>,

    /// Shared emulation tree (default: $EMULATION_ROOT or <user home>/Emulation)
    #[arg(long, global = true)]
    pub emulation_root: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Flag values layered over the config file and environment
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            user_home: self.user_home.clone(),
            emulation_root: self.emulation_root.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install or update the package and materialize its configuration
    Run(RunArgs),

    /// Compare the installed version with the registry, changing nothing
    Check(CheckArgs),

    /// Create the storage layout, default config and systems entry only
    Scaffold,

    /// Show version information
    Version(VersionArgs),
}

/// Release to resolve
#[derive(Args, Debug, Clone)]
pub struct ReleaseArgs {
    /// Install a specific release tag instead of the latest
    #[arg(long)]
    pub tag: Option<String>,
}

impl ReleaseArgs {
    pub fn selector(&self) -> ReleaseSelector {
        match &self.tag {
            Some(tag) => ReleaseSelector::Tag(tag.clone()),
            None => ReleaseSelector::Latest,
        }
    }
}

#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Skip the install stage; no registry or download access
    #[arg(long, conflicts_with_all = ["tag", "dry_run"])]
    pub skip_install: bool,

    /// Resolve and report what would happen without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Hide the download progress bar
    #[arg(long)]
    pub no_progress: bool,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub release: ReleaseArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}
