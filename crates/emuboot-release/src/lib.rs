//! Release handling for emuboot
//!
//! Provides:
//! - Release lookup against a GitHub-style registry ([`ReleaseResolver`])
//! - Asset selection by name prefix and suffix
//! - Streaming downloads with progress ([`Fetcher`])
//! - Tarball extraction ([`Archive`])

pub mod archive;
pub mod fetch;
pub mod releases;

pub use archive::{Archive, TarGzArchive};
pub use fetch::{build_client, Fetcher, HttpFetcher};
pub use releases::{
    select_asset, GitHubReleaseResolver, Release, ReleaseAsset, ReleaseResolver, ReleaseSelector,
};
