//! Runtime configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use earnings_core::DocTypeFilter;

/// Configuration for searching and downloading earnings documents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Root directory downloads are written under, one subdirectory per
    /// company.
    pub output_dir: PathBuf,
    /// How many recent fiscal quarters to fetch per company.
    pub quarters_per_company: usize,
    /// Which document kinds to fetch.
    pub doc_types: DocTypeFilter,
    /// Path to the exchange scrip CSV used for autocomplete.
    pub scrip_path: PathBuf,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Download retry attempts per file.
    pub max_retries: u32,
    /// Delay between retry attempts, in milliseconds.
    pub retry_delay_ms: u64,
    /// How many files to download concurrently.
    pub concurrent_downloads: usize,
    /// User agent sent with download requests.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            quarters_per_company: 5,
            doc_types: DocTypeFilter::default(),
            scrip_path: PathBuf::from("./data/bse_scrips.csv"),
            request_timeout_secs: 30,
            max_retries: 3,
            retry_delay_ms: 1000,
            concurrent_downloads: 4,
            user_agent: concat!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
                "AppleWebKit/537.36 (KHTML, like Gecko) ",
                "Chrome/120.0.0.0 Safari/537.36"
            )
            .to_string(),
        }
    }
}

impl Config {
    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Delay between download retries as a [`Duration`].
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Output directory for one company's downloads.
    ///
    /// The company name is reduced to alphanumerics, spaces, `-` and `_`,
    /// then spaces become underscores. The directory is not created here.
    #[must_use]
    pub fn output_path(&self, company: &str) -> PathBuf {
        let safe_name: String = company
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let safe_name = safe_name.trim().replace(' ', "_");
        self.output_dir.join(safe_name)
    }

    /// Replaces the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.output_dir = dir.as_ref().to_path_buf();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_sanitized() {
        let config = Config::default().with_output_dir("/tmp/earnings");
        assert_eq!(
            config.output_path("Procter & Gamble Co."),
            PathBuf::from("/tmp/earnings/Procter___Gamble_Co_")
        );
    }

    #[test]
    fn test_output_path_plain_name() {
        let config = Config::default().with_output_dir("/tmp/earnings");
        assert_eq!(
            config.output_path("Tata Motors"),
            PathBuf::from("/tmp/earnings/Tata_Motors")
        );
    }
}
