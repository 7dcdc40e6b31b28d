//! Check command: compare installed and published versions

use anyhow::{Context, Result};
use emuboot_core::{FileVersionStore, ReleaseMetadata, SetupConfig, VersionStore};
use emuboot_release::{build_client, GitHubReleaseResolver, ReleaseResolver};
use emuboot_setup::{decide, InstallDecision, InstallReason};
use serde::Serialize;

use crate::cli::CheckArgs;
use crate::output;

#[derive(Debug, Serialize)]
struct CheckReport {
    package: String,
    installed: Option<String>,
    executable_present: bool,
    release: ReleaseMetadata,
    decision: InstallDecision,
}

pub async fn run(args: CheckArgs, config: SetupConfig) -> Result<()> {
    let client = build_client(config.network())?;
    let resolver = GitHubReleaseResolver::new(client, config.registry().clone());
    let release = resolver
        .resolve(&args.release.selector(), config.asset_filter())
        .await
        .context("Failed to resolve release")?;

    let package = config.package();
    let installed = FileVersionStore::new(config.catalog_file()).get(&package.key())?;
    let executable_present = package.executable_path.exists();
    let decision = decide(installed.clone(), executable_present, &release.tag);

    let report = CheckReport {
        package: package.name.clone(),
        installed,
        executable_present,
        release,
        decision,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::header(&report.package);
    output::kv(
        "installed",
        report.installed.as_deref().unwrap_or("not installed"),
    );
    output::kv("release", &report.release.tag);
    output::kv("asset", &report.release.asset_name);
    match &report.decision {
        InstallDecision::Skip { .. } => output::success("Up to date"),
        InstallDecision::Install { reason, .. } => output::info(match reason {
            InstallReason::ExecutableMissing => "Install needed: executable missing",
            InstallReason::VersionChanged => "Install needed: version differs",
        }),
    }
    Ok(())
}
