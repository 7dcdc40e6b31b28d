//! Run command: install, then materialize configuration

use anyhow::{Context, Result};
use emuboot_core::{EnsureOutcome, FileVersionStore, SetupConfig};
use emuboot_release::{build_client, GitHubReleaseResolver, HttpFetcher, TarGzArchive};
use emuboot_setup::{InstallDecision, InstallResult, Pipeline, RunSummary, Scaffold};

use crate::cli::RunArgs;
use crate::output;

pub async fn run(args: RunArgs, config: SetupConfig, quiet: bool) -> Result<()> {
    let client = build_client(config.network())?;
    let resolver = GitHubReleaseResolver::new(client.clone(), config.registry().clone());
    let fetcher = HttpFetcher::new(client).with_progress(!args.no_progress && !quiet);
    let store = FileVersionStore::new(config.catalog_file());
    let pipeline = Pipeline::new(&config, &resolver, &fetcher, &TarGzArchive, &store)?;
    let selector = args.release.selector();

    if args.dry_run {
        let release = pipeline
            .resolve(&selector)
            .await
            .context("Failed to resolve release")?;
        let decision = pipeline.installer().plan(&release)?;
        print_dry_run(&config, &decision);
        return Ok(());
    }

    let summary = pipeline
        .run(&selector, args.skip_install)
        .await
        .with_context(|| format!("Failed to set up {}", config.package().name))?;

    if !quiet {
        print_summary(&config, &summary);
    }
    Ok(())
}

fn print_dry_run(config: &SetupConfig, decision: &InstallDecision) {
    output::header("Dry run");
    match decision {
        InstallDecision::Skip { version } => {
            output::info(&format!("{} {} is up to date", config.package().name, version));
        }
        InstallDecision::Install {
            previous,
            version,
            reason,
        } => {
            output::info(&format!(
                "Would install {} {} (installed: {}, reason: {:?})",
                config.package().name,
                version,
                previous.as_deref().unwrap_or("none"),
                reason
            ));
            output::kv("install dir", config.install_dir().as_str());
            output::kv("executable", config.package().executable_path.as_str());
        }
    }

    output::header("Would ensure");
    for entry in Scaffold::new(config).plan() {
        println!("  {}", entry.path());
    }
    println!("  {}", config.config_file());
    println!("  {}", config.systems_file());
    println!("  {}", config.desktop_entry_path());
}

fn print_summary(config: &SetupConfig, summary: &RunSummary) {
    output::header(&format!("{} ready", config.package().name));
    match &summary.install {
        Some(InstallResult::Installed { previous, version }) => output::success(&format!(
            "Installed {} (was {})",
            version,
            previous.as_deref().unwrap_or("not installed")
        )),
        Some(InstallResult::AlreadyInstalled { version }) => {
            output::success(&format!("{} already installed", version))
        }
        None => output::info("Install skipped"),
    }
    output::kv("executable", summary.executable.as_str());
    output::kv("menu entry", summary.menu_entry.as_str());

    let materialized = &summary.materialized;
    output::kv(
        "layout",
        &format!(
            "{} created, {} present, {} occupied",
            materialized.count(EnsureOutcome::Created),
            materialized.count(EnsureOutcome::Present),
            materialized.count(EnsureOutcome::Occupied)
        ),
    );
    output::kv("Config.json", &output::outcome_label(materialized.default_config));
    output::kv("systems entry", &output::outcome_label(materialized.systems));

    for report in &materialized.scaffold {
        if report.outcome == EnsureOutcome::Occupied {
            output::warning(&format!("{} is occupied and was left alone", report.path));
        }
    }
}
