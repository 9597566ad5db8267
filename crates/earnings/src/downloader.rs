//! Concurrent document downloads.

use std::path::{Path, PathBuf};

use futures::StreamExt;
use tracing::{debug, warn};

use earnings_core::{Document, EarningsError, Result};

use crate::config::Config;

/// Outcome of one document download.
#[derive(Debug)]
pub struct DownloadOutcome {
    /// The document this outcome belongs to.
    pub document: Document,
    /// How the download ended.
    pub status: DownloadStatus,
}

/// Terminal state of a single file download.
#[derive(Debug, PartialEq, Eq)]
pub enum DownloadStatus {
    /// File fetched and written.
    Downloaded(PathBuf),
    /// File already existed on disk; nothing fetched.
    SkippedExisting(PathBuf),
    /// All retry attempts failed.
    Failed(String),
}

impl DownloadStatus {
    /// True unless the download failed.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

/// Downloads document files with bounded concurrency and per-file retries.
///
/// A failure of one file never aborts its siblings; each file gets its own
/// retry budget and the overall request timeout comes from the HTTP client.
#[derive(Debug)]
pub struct Downloader {
    client: reqwest::Client,
    max_retries: u32,
    retry_delay: std::time::Duration,
    concurrency: usize,
}

impl Downloader {
    /// Creates a downloader configured from `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout() * 2)
            .build()
            .map_err(|e| EarningsError::Other(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_retries: config.max_retries.max(1),
            retry_delay: config.retry_delay(),
            concurrency: config.concurrent_downloads.max(1),
        })
    }

    /// Downloads every document into `output_dir`, creating it if needed.
    ///
    /// Returns one outcome per input document, in completion order.
    pub async fn download_all(
        &self,
        documents: Vec<Document>,
        output_dir: &Path,
    ) -> Result<Vec<DownloadOutcome>> {
        tokio::fs::create_dir_all(output_dir).await?;

        let outcomes = futures::stream::iter(documents.into_iter().map(|document| {
            let target = output_dir.join(document.filename());
            async move {
                let status = self.download_file(&document, &target).await;
                if let DownloadStatus::Failed(reason) = &status {
                    warn!(url = %document.url, reason, "Download failed");
                }
                DownloadOutcome { document, status }
            }
        }))
        .buffer_unordered(self.concurrency)
        .collect::<Vec<_>>()
        .await;

        Ok(outcomes)
    }

    /// Downloads one file with retries; skips work when the target exists.
    async fn download_file(&self, document: &Document, target: &Path) -> DownloadStatus {
        if target.exists() {
            debug!(path = %target.display(), "Skipping existing file");
            return DownloadStatus::SkippedExisting(target.to_path_buf());
        }

        let mut last_error = String::new();
        for attempt in 0..self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(self.retry_delay).await;
            }

            match self.try_fetch(&document.url, target).await {
                Ok(()) => {
                    debug!(path = %target.display(), "Downloaded");
                    return DownloadStatus::Downloaded(target.to_path_buf());
                }
                Err(e) => last_error = e.to_string(),
            }
        }

        DownloadStatus::Failed(last_error)
    }

    async fn try_fetch(&self, url: &str, target: &Path) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EarningsError::Network(format!("HTTP {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        tokio::fs::write(target, &body).await?;
        Ok(())
    }
}
