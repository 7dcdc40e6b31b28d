//! emuboot CLI - emulator package provisioning at container startup
//!
//! This is the main entry point for the emuboot command-line interface.

mod cli;
mod commands;
mod output;
mod version;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Must happen before any TLS operation
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    dispatch(cli).await
}

async fn dispatch(cli: Cli) -> Result<()> {
    let overrides = cli.overrides();
    let config_file = cli.config.clone();
    // Resolved before any network or filesystem access
    let config = || commands::load_config(config_file.as_deref(), &overrides);

    match cli.command {
        Commands::Version(args) => commands::version::run(args),
        Commands::Run(args) => commands::run::run(args, config()?, cli.quiet).await,
        Commands::Check(args) => commands::check::run(args, config()?).await,
        Commands::Scaffold => commands::scaffold::run(config()?, cli.quiet),
    }
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}
