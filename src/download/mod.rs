//! Streaming media download with progress reporting.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Seam for fetching a remote media file to a local path.
///
/// The existence check for the destination lives in the orchestrator, not
/// here; a fetcher is only invoked for paths that do not exist yet.
#[async_trait]
pub trait MediaFetcher {
    /// Download `url` to `dest`, returning the written size in megabytes.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<f64>;
}

/// Fetcher backed by a streaming HTTP GET.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaFetcher for HttpFetcher {
    /// On failure the partially written file is left in place; a later run
    /// will treat the path as already downloaded and skip it.
    async fn fetch(&self, url: &str, dest: &Path) -> Result<f64> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to open download stream")?
            .error_for_status()
            .context("Download request rejected")?;

        let total = response.content_length().unwrap_or(0);
        let pb = download_progress_bar(total, dest);

        let mut file = File::create(dest)
            .await
            .with_context(|| format!("Failed to create {}", dest.display()))?;

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("Download stream interrupted")?;
            file.write_all(&chunk)
                .await
                .with_context(|| format!("Failed to write {}", dest.display()))?;
            pb.inc(chunk.len() as u64);
        }
        file.flush().await?;
        pb.finish_and_clear();

        let bytes = tokio::fs::metadata(dest)
            .await
            .with_context(|| format!("Failed to stat {}", dest.display()))?
            .len();
        Ok(bytes_to_mb(bytes))
    }
}

pub fn bytes_to_mb(bytes: u64) -> f64 {
    bytes as f64 / BYTES_PER_MB
}

/// Byte-progress bar keyed by the destination file name. A zero total
/// (server sent no content length) still renders the byte counter.
fn download_progress_bar(total: u64, dest: &Path) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .unwrap()
            .progress_chars("━╸━"),
    );
    pb.set_message(
        dest.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(0), 0.0);
        assert_eq!(bytes_to_mb(1_048_576), 1.0);
        assert_eq!(bytes_to_mb(5 * 1_048_576 + 524_288), 5.5);
    }

    #[test]
    fn test_progress_bar_message_is_file_name() {
        let pb = download_progress_bar(100, Path::new("/tmp/downloads/Standup_abc.mp4"));
        assert_eq!(pb.message(), "Standup_abc.mp4");
    }
}
