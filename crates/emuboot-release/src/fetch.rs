//! Archive and icon download
//!
//! Downloads stream to `<dest>.part` and are renamed into place once the body
//! has been read completely. There is no retry and no resume.

use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use emuboot_core::config::NetworkConfig;
use emuboot_core::{Error, Result};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::io::Write;
use std::time::Duration;
use tracing::{debug, info};

/// Downloads a URL to a local file
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Download `url` to `dest`, returning the number of bytes written
    async fn fetch_to_file(&self, url: &str, dest: &Utf8Path) -> Result<u64>;
}

/// Build the HTTP client shared by the resolver and the fetcher
pub fn build_client(network: &NetworkConfig) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(&network.user_agent)
        .timeout(Duration::from_secs(network.http_timeout_secs))
        .build()
        .map_err(|e| Error::invalid_config(format!("Failed to create HTTP client: {}", e)))
}

/// Fetcher backed by reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
    show_progress: bool,
}

impl HttpFetcher {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            show_progress: true,
        }
    }

    /// Enable or disable progress bars
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    fn progress_bar(&self, total: Option<u64>, name: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = match total {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{msg}\n{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => ProgressBar::new_spinner(),
        };
        pb.set_message(format!("Downloading {}", name));
        Some(pb)
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_to_file(&self, url: &str, dest: &Utf8Path) -> Result<u64> {
        debug!("Downloading {} -> {}", url, dest);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::download_failed(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::download_failed(url, format!("HTTP {}", status)));
        }

        let name = dest.file_name().unwrap_or(dest.as_str()).to_string();
        let progress = self.progress_bar(response.content_length(), &name);

        let part_path = Utf8PathBuf::from(format!("{}.part", dest));
        let mut file =
            fs::File::create(&part_path).map_err(|e| Error::fs("create", &part_path, e))?;

        let mut downloaded = 0u64;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk: bytes::Bytes = chunk.map_err(|e| Error::download_failed(url, e))?;
            file.write_all(&chunk)
                .map_err(|e| Error::fs("write", &part_path, e))?;
            downloaded += chunk.len() as u64;
            if let Some(pb) = &progress {
                pb.set_position(downloaded);
            }
        }
        file.sync_all()
            .map_err(|e| Error::fs("sync", &part_path, e))?;
        drop(file);

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Downloaded {}", name));
        }

        fs::rename(&part_path, dest).map_err(|e| Error::fs("rename", &part_path, e))?;
        info!("Downloaded {} ({})", name, human_readable_size(downloaded));
        Ok(downloaded)
    }
}

/// Convert bytes to human-readable size
fn human_readable_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_index])
}
