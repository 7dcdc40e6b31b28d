//! Common test infrastructure for emuboot-release tests
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```

#![allow(dead_code)]

use emuboot_core::config::{NetworkConfig, RegistryConfig};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "Ryubing";
pub const REPO: &str = "Stable-Releases";
pub const TAG: &str = "1.3.2";
pub const LINUX_ASSET: &str = "ryujinx-1.3.2-linux_x64.tar.gz";
pub const WINDOWS_ASSET: &str = "ryujinx-1.3.2-win_x64.zip";
pub const FAKE_ARCHIVE_CONTENT: &[u8] = b"fake archive content";

pub fn registry_for(server: &MockServer) -> RegistryConfig {
    RegistryConfig {
        api_url: server.uri(),
        owner: OWNER.to_string(),
        repo: REPO.to_string(),
    }
}

pub fn test_client() -> reqwest::Client {
    emuboot_release::build_client(&NetworkConfig {
        http_timeout_secs: 10,
        user_agent: "emuboot-tests".to_string(),
    })
    .unwrap()
}

/// Release document listing `assets` in order
pub fn release_json(server: &MockServer, tag: &str, assets: &[&str]) -> serde_json::Value {
    let assets: Vec<_> = assets
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "id": 100 + i as u64,
                "name": name,
                "browser_download_url": format!("{}/download/{}", server.uri(), name),
                "size": FAKE_ARCHIVE_CONTENT.len(),
            })
        })
        .collect();
    json!({ "tag_name": tag, "name": format!("Release {}", tag), "assets": assets })
}

/// Mount `/repos/{owner}/{repo}/releases/latest`
pub async fn mock_latest_release(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases/latest", OWNER, REPO)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount `/repos/{owner}/{repo}/releases/tags/{tag}`
pub async fn mock_tagged_release(server: &MockServer, tag: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}/releases/tags/{}", OWNER, REPO, tag)))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mount a download endpoint at `/download/{name}`
pub async fn mock_download(server: &MockServer, name: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/download/{}", name)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

/// Mount an endpoint that always fails with `status`
pub async fn mock_status(server: &MockServer, url_path: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(url_path.to_string()))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}
