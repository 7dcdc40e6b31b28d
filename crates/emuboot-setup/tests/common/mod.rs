//! Common test infrastructure for emuboot-setup tests
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use emuboot_core::{Error, ReleaseMetadata, Result, Settings, SetupConfig};
use emuboot_release::{Fetcher, Release, ReleaseAsset, ReleaseResolver, ReleaseSelector};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::sync::Mutex;
use tempfile::TempDir;

pub const ICON_URL: &str = "https://example.invalid/icon.png";
pub const ICON_BYTES: &[u8] = b"\x89PNG fake icon";
pub const ENTRYPOINT_SCRIPT: &[u8] = b"#!/bin/sh\nexec \"$(dirname \"$0\")/Ryujinx\" \"$@\"\n";

/// Workspace with a home and an emulation root under one temp dir
pub struct TestEnv {
    pub temp: TempDir,
    pub config: SetupConfig,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();

        let mut settings = Settings::embedded().unwrap();
        settings.package.icon_url = ICON_URL.to_string();

        let config =
            SetupConfig::from_settings(settings, root.join("home"), Some(root.join("Emulation")))
                .unwrap();
        Self { temp, config }
    }

    pub fn root(&self) -> &Utf8Path {
        Utf8Path::from_path(self.temp.path()).unwrap()
    }

    /// Every regular file and symlink under the temp dir with its content
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }
}

fn collect(root: &Utf8Path, dir: &Utf8Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let entry = entry.unwrap();
        let path = Utf8PathBuf::from_path_buf(entry.path()).unwrap();
        let relative = path.strip_prefix(root).unwrap().to_string();
        let file_type = entry.file_type().unwrap();
        if file_type.is_symlink() {
            let target = fs::read_link(&path).unwrap();
            files.insert(relative, target.to_string_lossy().into_owned().into_bytes());
        } else if file_type.is_dir() {
            files.insert(format!("{}/", relative), Vec::new());
            collect(root, &path, files);
        } else {
            files.insert(relative, fs::read(&path).unwrap());
        }
    }
}

/// Release metadata pointing at a fake download URL
pub fn release(tag: &str) -> ReleaseMetadata {
    let asset_name = format!("ryujinx-{}-linux_x64.tar.gz", tag);
    ReleaseMetadata {
        tag: tag.to_string(),
        asset_id: 100,
        download_url: format!("https://example.invalid/download/{}", asset_name),
        asset_name,
    }
}

/// gzip tarball holding the package's `publish/` tree
pub fn package_tarball(version: &str) -> Vec<u8> {
    let binary = format!("Ryujinx {}", version);
    let entries: [(&str, &[u8], u32); 2] = [
        ("publish/Ryujinx.sh", ENTRYPOINT_SCRIPT, 0o755),
        ("publish/Ryujinx", binary.as_bytes(), 0o755),
    ];

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    for (name, data, mode) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Fetcher serving canned bodies and recording every requested URL
#[derive(Default)]
pub struct FakeFetcher {
    bodies: Mutex<HashMap<String, Vec<u8>>>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetcher that serves the icon and the tarball for `release`
    pub fn serving(release: &ReleaseMetadata) -> Self {
        let fetcher = Self::new();
        fetcher.serve(ICON_URL, ICON_BYTES);
        fetcher.serve(&release.download_url, &package_tarball(&release.tag));
        fetcher
    }

    pub fn serve(&self, url: &str, body: &[u8]) {
        self.bodies
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_vec());
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than the icon
    pub fn downloads(&self) -> usize {
        self.requests().iter().filter(|url| *url != ICON_URL).count()
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch_to_file(&self, url: &str, dest: &Utf8Path) -> Result<u64> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self
            .bodies
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| Error::download_failed(url, "HTTP 404 Not Found"))?;
        fs::write(dest, &body).map_err(|e| Error::fs("write", dest, e))?;
        Ok(body.len() as u64)
    }
}

/// Resolver answering every selector with one release
pub struct FakeResolver {
    release: Mutex<Release>,
    lookups: Mutex<Vec<ReleaseSelector>>,
}

impl FakeResolver {
    pub fn new(metadata: &ReleaseMetadata) -> Self {
        Self {
            release: Mutex::new(release_document(metadata)),
            lookups: Mutex::new(Vec::new()),
        }
    }

    /// Publish a new release upstream
    pub fn publish(&self, metadata: &ReleaseMetadata) {
        *self.release.lock().unwrap() = release_document(metadata);
    }

    pub fn lookups(&self) -> Vec<ReleaseSelector> {
        self.lookups.lock().unwrap().clone()
    }
}

fn release_document(metadata: &ReleaseMetadata) -> Release {
    Release {
        tag_name: metadata.tag.clone(),
        assets: vec![
            ReleaseAsset {
                id: metadata.asset_id,
                name: metadata.asset_name.clone(),
                browser_download_url: metadata.download_url.clone(),
            },
            ReleaseAsset {
                id: metadata.asset_id + 1,
                name: format!("ryujinx-{}-win_x64.zip", metadata.tag),
                browser_download_url: "https://example.invalid/win.zip".to_string(),
            },
        ],
    }
}

#[async_trait]
impl ReleaseResolver for FakeResolver {
    async fn fetch_release(&self, selector: &ReleaseSelector) -> Result<Release> {
        self.lookups.lock().unwrap().push(selector.clone());
        Ok(self.release.lock().unwrap().clone())
    }
}
