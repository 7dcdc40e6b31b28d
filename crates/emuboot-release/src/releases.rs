//! Release registry lookup
//!
//! Fetches release metadata from a GitHub-style releases API and selects the
//! asset to install. Metadata is fetched fresh on every call.

use async_trait::async_trait;
use emuboot_core::config::RegistryConfig;
use emuboot_core::{AssetFilter, Error, ReleaseMetadata, Result};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::debug;

/// Release information
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag (e.g., "1.3.2")
    pub tag_name: String,

    /// Release assets, in the registry's listed order
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// Release asset
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseAsset {
    /// Asset id
    pub id: u64,

    /// Asset name
    pub name: String,

    /// Download URL
    pub browser_download_url: String,
}

/// Which release to resolve
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ReleaseSelector {
    /// The registry's latest release
    #[default]
    Latest,
    /// A release by tag
    Tag(String),
}

/// Pick the first asset matching `filter`, in listed order
///
/// When several assets match, the first listed one wins. Registry ordering
/// is not guaranteed stable across calls.
pub fn select_asset(release: &Release, filter: &AssetFilter) -> Result<ReleaseMetadata> {
    let asset = release
        .assets
        .iter()
        .find(|a| filter.matches(&a.name))
        .ok_or_else(|| Error::AssetNotFound {
            tag: release.tag_name.clone(),
            prefix: filter.prefix.clone(),
            suffix: filter.suffix.clone(),
        })?;

    debug!(
        "Selected asset {} (id {}) from release {}",
        asset.name, asset.id, release.tag_name
    );

    Ok(ReleaseMetadata {
        tag: release.tag_name.clone(),
        asset_id: asset.id,
        asset_name: asset.name.clone(),
        download_url: asset.browser_download_url.clone(),
    })
}

/// Source of release metadata
#[async_trait]
pub trait ReleaseResolver: Send + Sync {
    /// Fetch a release document
    async fn fetch_release(&self, selector: &ReleaseSelector) -> Result<Release>;

    /// Fetch a release and select the asset matching `filter`
    async fn resolve(
        &self,
        selector: &ReleaseSelector,
        filter: &AssetFilter,
    ) -> Result<ReleaseMetadata> {
        let release = self.fetch_release(selector).await?;
        select_asset(&release, filter)
    }
}

/// Resolver backed by the GitHub releases API
pub struct GitHubReleaseResolver {
    client: reqwest::Client,
    registry: RegistryConfig,
}

impl GitHubReleaseResolver {
    pub fn new(client: reqwest::Client, registry: RegistryConfig) -> Self {
        Self { client, registry }
    }

    fn url_for(&self, selector: &ReleaseSelector) -> String {
        match selector {
            ReleaseSelector::Latest => self.registry.latest_url(),
            ReleaseSelector::Tag(tag) => self.registry.tag_url(tag),
        }
    }
}

#[async_trait]
impl ReleaseResolver for GitHubReleaseResolver {
    async fn fetch_release(&self, selector: &ReleaseSelector) -> Result<Release> {
        let url = self.url_for(selector);
        debug!("Fetching release from: {}", url);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| Error::registry_unavailable(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::registry_unavailable(
                &url,
                format!("HTTP {}", status),
            ));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::registry_unavailable(&url, e))?;

        serde_json::from_str(&body).map_err(|e| Error::invalid_registry_response(&url, e))
    }
}
