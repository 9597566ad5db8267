#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! SEC EDGAR earnings document source.
//!
//! EDGAR carries official filings, not call transcripts: 10-Q quarterly
//! reports stand in for transcripts, 10-K annual reports for presentations,
//! and 8-K current reports for press releases.
//!
//! # Example
//!
//! ```rust,ignore
//! use earnings_edgar::EdgarSource;
//! use earnings_core::{DocTypeFilter, EarningsSource};
//!
//! #[tokio::main]
//! async fn main() -> earnings_core::Result<()> {
//!     let source = EdgarSource::new("MyApp/1.0 (contact@example.com)");
//!     let docs = source
//!         .fetch_documents("Apple", 4, &DocTypeFilter::default())
//!         .await?;
//!     for doc in docs {
//!         println!("{} {} {} {}", doc.quarter, doc.year, doc.doc_type, doc.url);
//!     }
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::{debug, warn};

use earnings_core::{
    CompanyMatch, DocType, DocTypeFilter, Document, EarningsError, EarningsSource, FiscalYearType,
    Region, Result, find_best_match, latest_quarters, normalize_company_name,
};

/// SEC company tickers file.
const COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

/// Submissions API, `{cik}` zero-padded to 10 digits.
const SUBMISSIONS_URL: &str = "https://data.sec.gov/submissions/CIK{cik}.json";

/// Default rate limit: 10 requests per second (SEC requirement).
const DEFAULT_RATE_LIMIT: Duration = Duration::from_millis(100);

/// Fuzzy-match threshold for company-name resolution.
const NAME_MATCH_THRESHOLD: u32 = 70;

/// Rate limiter to ensure we don't exceed SEC's rate limits.
#[derive(Debug)]
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// A resolved SEC-registered company.
#[derive(Debug, Clone)]
struct TickerEntry {
    cik: String,
    ticker: String,
    name: String,
}

/// SEC EDGAR earnings document source for US companies.
///
/// The ticker table is fetched once and cached in-process. Implements rate
/// limiting per SEC requirements (max 10 requests/second).
#[derive(Debug)]
pub struct EdgarSource {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    ticker_cache: Arc<Mutex<Option<Arc<Vec<TickerEntry>>>>>,
}

impl EdgarSource {
    /// Creates a new EDGAR source with the specified user agent.
    ///
    /// The SEC requires identifying user agent headers. Format should be:
    /// "AppName/Version (contact@email.com)"
    #[must_use]
    pub fn new(user_agent: &str) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self::with_client(client)
    }

    /// Creates a new EDGAR source with a pre-configured HTTP client.
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(DEFAULT_RATE_LIMIT))),
            ticker_cache: Arc::new(Mutex::new(None)),
        }
    }

    /// Fetches and caches the SEC ticker table.
    async fn ticker_table(&self) -> Result<Arc<Vec<TickerEntry>>> {
        let mut cache = self.ticker_cache.lock().await;
        if let Some(entries) = cache.as_ref() {
            return Ok(entries.clone());
        }

        self.rate_limiter.lock().await.wait().await;

        debug!("Fetching company tickers from SEC");
        let response = self
            .client
            .get(COMPANY_TICKERS_URL)
            .send()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EarningsError::Network(format!(
                "Failed to fetch company tickers: HTTP {}",
                response.status()
            )));
        }

        let data: HashMap<String, CompanyTickerInfo> = response
            .json()
            .await
            .map_err(|e| EarningsError::Parse(format!("Failed to parse company tickers: {e}")))?;

        let entries: Vec<TickerEntry> = data
            .into_values()
            .map(|info| TickerEntry {
                cik: format!("{:0>10}", info.cik_str),
                ticker: info.ticker.to_uppercase(),
                name: info.title,
            })
            .collect();

        let entries = Arc::new(entries);
        *cache = Some(entries.clone());
        Ok(entries)
    }

    /// Resolves a company name or ticker to a SEC registration.
    ///
    /// Tried in order: exact ticker match, exact normalized-name match,
    /// substring containment, fuzzy match.
    async fn resolve_company(&self, query: &str) -> Result<Option<TickerEntry>> {
        let entries = self.ticker_table().await?;
        let query_upper = query.trim().to_uppercase();
        let query_norm = normalize_company_name(query).to_lowercase();

        if let Some(entry) = entries.iter().find(|e| e.ticker == query_upper) {
            return Ok(Some(entry.clone()));
        }

        if let Some(entry) = entries
            .iter()
            .find(|e| normalize_company_name(&e.name).to_lowercase() == query_norm)
        {
            return Ok(Some(entry.clone()));
        }

        if let Some(entry) = entries.iter().find(|e| {
            let name = e.name.to_lowercase();
            name.contains(&query_norm) || query_norm.contains(&name)
        }) {
            return Ok(Some(entry.clone()));
        }

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        if let Some(best) = find_best_match(query, names, NAME_MATCH_THRESHOLD) {
            return Ok(entries.iter().find(|e| e.name == best).cloned());
        }

        Ok(None)
    }

    /// Fetches the recent-filings listing for a CIK.
    async fn fetch_submissions(&self, cik: &str) -> Result<SubmissionsResponse> {
        self.rate_limiter.lock().await.wait().await;

        let url = SUBMISSIONS_URL.replace("{cik}", cik);
        debug!(%url, "Fetching company submissions");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EarningsError::Network(format!(
                "Failed to fetch submissions for CIK {cik}: HTTP {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| EarningsError::Parse(format!("Failed to parse submissions: {e}")))
    }
}

/// Maps a SEC form type to the document kind it stands in for.
fn doc_type_for_form(form: &str) -> Option<DocType> {
    match form {
        "10-Q" => Some(DocType::Transcript),
        "10-K" => Some(DocType::Presentation),
        "8-K" => Some(DocType::PressRelease),
        _ => None,
    }
}

/// Maps a filing date to the quarter the filing reports on.
///
/// Filings land shortly after the reported period ends: a Jan-Mar filing
/// covers Q4 of the previous calendar year, Apr-Jun covers Q1, and so on.
/// Annual 10-K filings use the literal `"FY"` quarter with the filing year.
fn period_for_filing(date: NaiveDate, form: &str) -> (String, String) {
    if form == "10-K" {
        return ("FY".to_string(), date.year().to_string());
    }

    let (quarter, report_year) = match date.month() {
        1..=3 => ("Q4", date.year() - 1),
        4..=6 => ("Q1", date.year()),
        7..=9 => ("Q2", date.year()),
        _ => ("Q3", date.year()),
    };
    (quarter.to_string(), report_year.to_string())
}

/// Builds the archive URL of a filing's primary document.
fn document_url(cik: &str, accession: &str, primary_doc: &str) -> String {
    let accession = accession.replace('-', "");
    format!(
        "https://www.sec.gov/Archives/edgar/data/{}/{}/{}",
        cik.trim_start_matches('0'),
        accession,
        primary_doc
    )
}

#[async_trait]
impl EarningsSource for EdgarSource {
    fn region(&self) -> Region {
        Region::Us
    }

    fn source_name(&self) -> &str {
        "edgar"
    }

    fn priority(&self) -> u8 {
        1
    }

    fn fiscal_year_type(&self) -> FiscalYearType {
        FiscalYearType::Calendar
    }

    async fn search_company(&self, query: &str) -> Result<Option<CompanyMatch>> {
        let Some(entry) = self.resolve_company(query).await? else {
            return Ok(None);
        };

        Ok(Some(CompanyMatch {
            name: entry.name,
            symbol: Some(entry.ticker),
            identifier: Some(entry.cik.clone()),
            url: format!(
                "https://www.sec.gov/cgi-bin/browse-edgar?action=getcompany&CIK={}&type=10-&dateb=&owner=include&count=40",
                entry.cik
            ),
            source: self.source_name().to_string(),
            region: self.region(),
        }))
    }

    async fn fetch_documents(
        &self,
        company: &str,
        count: usize,
        filter: &DocTypeFilter,
    ) -> Result<Vec<Document>> {
        let Some(entry) = self.resolve_company(company).await? else {
            warn!(company, "Company not found in SEC database");
            return Ok(Vec::new());
        };

        let submissions = match self.fetch_submissions(&entry.cik).await {
            Ok(submissions) => submissions,
            Err(e) => {
                // Partial results, not a pipeline error.
                warn!(company, error = %e, "Error fetching from SEC EDGAR");
                return Ok(Vec::new());
            }
        };

        let recent = submissions.filings.recent;
        let mut documents = Vec::new();

        for (i, form) in recent.form.iter().enumerate() {
            let Some(doc_type) = doc_type_for_form(form) else {
                continue;
            };
            if !filter.includes(doc_type) {
                continue;
            }

            let Some(filed) = recent
                .filing_date
                .get(i)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            else {
                continue;
            };
            let (quarter, year) = period_for_filing(filed, form);

            let (Some(accession), Some(primary_doc)) = (
                recent.accession_number.get(i),
                recent.primary_document.get(i),
            ) else {
                continue;
            };
            if accession.is_empty() || primary_doc.is_empty() {
                continue;
            }

            documents.push(
                Document::new(
                    entry.name.clone(),
                    quarter,
                    year,
                    doc_type,
                    document_url(&entry.cik, accession, primary_doc),
                    self.source_name(),
                )
                .with_date(filed.and_time(NaiveTime::MIN).and_utc()),
            );
        }

        Ok(latest_quarters(documents, count))
    }
}

// =============================================================================
// SEC API Response Types
// =============================================================================

/// Company ticker information from SEC JSON.
#[derive(Debug, Deserialize)]
struct CompanyTickerInfo {
    /// CIK as a number (SEC returns this as an integer).
    cik_str: u64,
    /// Ticker symbol.
    ticker: String,
    /// Company name.
    title: String,
}

/// Response from the submissions API.
#[derive(Debug, Deserialize)]
struct SubmissionsResponse {
    filings: Filings,
}

#[derive(Debug, Deserialize)]
struct Filings {
    recent: RecentFilings,
}

/// Column-oriented recent filings listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecentFilings {
    #[serde(default)]
    form: Vec<String>,
    #[serde(default)]
    filing_date: Vec<String>,
    #[serde(default)]
    accession_number: Vec<String>,
    #[serde(default)]
    primary_document: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_metadata() {
        let source = EdgarSource::new("Test/1.0 (test@example.com)");
        assert_eq!(source.source_name(), "edgar");
        assert_eq!(source.region(), Region::Us);
        assert_eq!(source.priority(), 1);
        assert_eq!(source.fiscal_year_type(), FiscalYearType::Calendar);
    }

    #[test]
    fn test_form_mapping() {
        assert_eq!(doc_type_for_form("10-Q"), Some(DocType::Transcript));
        assert_eq!(doc_type_for_form("10-K"), Some(DocType::Presentation));
        assert_eq!(doc_type_for_form("8-K"), Some(DocType::PressRelease));
        assert_eq!(doc_type_for_form("S-1"), None);
    }

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_period_for_quarterly_filing() {
        // A February filing reports Q4 of the prior year.
        assert_eq!(
            period_for_filing(ymd(2025, 2, 10), "10-Q"),
            ("Q4".to_string(), "2024".to_string())
        );
        assert_eq!(
            period_for_filing(ymd(2025, 5, 1), "10-Q"),
            ("Q1".to_string(), "2025".to_string())
        );
        assert_eq!(
            period_for_filing(ymd(2025, 11, 20), "8-K"),
            ("Q3".to_string(), "2025".to_string())
        );
    }

    #[test]
    fn test_period_for_annual_filing() {
        assert_eq!(
            period_for_filing(ymd(2025, 2, 10), "10-K"),
            ("FY".to_string(), "2025".to_string())
        );
    }

    #[test]
    fn test_document_url_strips_leading_zeros() {
        let url = document_url("0000320193", "0000320193-25-000001", "aapl-10q.htm");
        assert_eq!(
            url,
            "https://www.sec.gov/Archives/edgar/data/320193/000032019325000001/aapl-10q.htm"
        );
    }

    #[test]
    fn test_submissions_deserialization() {
        let json = r#"{
            "filings": {
                "recent": {
                    "form": ["10-Q", "8-K"],
                    "filingDate": ["2025-05-01", "2025-04-20"],
                    "accessionNumber": ["0000320193-25-000001", "0000320193-25-000002"],
                    "primaryDocument": ["aapl-10q.htm", "aapl-8k.htm"]
                }
            }
        }"#;
        let parsed: SubmissionsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.filings.recent.form.len(), 2);
        assert_eq!(parsed.filings.recent.filing_date[0], "2025-05-01");
    }
}
