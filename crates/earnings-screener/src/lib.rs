#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Screener.in earnings document source.
//!
//! # Example
//!
//! ```rust,ignore
//! use earnings_screener::ScreenerSource;
//! use earnings_core::{DocTypeFilter, EarningsSource};
//!
//! #[tokio::main]
//! async fn main() -> earnings_core::Result<()> {
//!     let source = ScreenerSource::new();
//!     let docs = source
//!         .fetch_documents("Lupin", 4, &DocTypeFilter::default())
//!         .await?;
//!     println!("found {} documents", docs.len());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

use earnings_core::{
    CompanyMatch, DocType, DocTypeFilter, Document, EarningsError, EarningsSource, FiscalYearType,
    Region, Result, latest_quarters, normalize_company_name, parse_period,
};

/// Screener.in site root.
const BASE_URL: &str = "https://www.screener.in";

/// Company search API endpoint.
const SEARCH_URL: &str = "https://www.screener.in/api/company/search/";

static COMPANY_NAME_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h1.margin-0").expect("valid company name selector"));

static DOCUMENTS_SECTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#documents").expect("valid documents selector"));

/// Fallback when the page carries no `#documents` anchor.
static DOCUMENTS_FALLBACK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(
        "section[id*=\"document\"], section[id*=\"concall\"], \
         div[class*=\"concall\"], div[class*=\"document\"]",
    )
    .expect("valid fallback selector")
});

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a").expect("valid anchor selector"));

static TRANSCRIPT_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)transcript").expect("valid transcript pattern"));

static PRESENTATION_TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ppt|presentation").expect("valid presentation pattern"));

/// Screener.in earnings document source for Indian companies.
#[derive(Debug)]
pub struct ScreenerSource {
    client: reqwest::Client,
}

impl Default for ScreenerSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ScreenerSource {
    /// Creates a new Screener.in source with a browser-like user agent.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                 AppleWebKit/537.36 (KHTML, like Gecko) \
                 Chrome/120.0.0.0 Safari/537.36",
            )
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self::with_client(client)
    }

    /// Creates a new Screener.in source with a pre-configured HTTP client.
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Resolves a company name to its Screener.in page URL via the search
    /// API, taking the first hit.
    async fn search_url(&self, company: &str) -> Result<Option<SearchHit>> {
        let normalized = normalize_company_name(company);

        let response = self
            .client
            .get(SEARCH_URL)
            .query(&[("q", normalized.as_str())])
            .send()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EarningsError::Network(format!(
                "Screener search failed: HTTP {}",
                response.status()
            )));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| EarningsError::Parse(format!("Failed to parse search results: {e}")))?;

        Ok(hits.into_iter().next())
    }

    async fn fetch_company_page(&self, url: &str) -> Result<String> {
        debug!(%url, "Fetching Screener.in company page");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EarningsError::Network(format!(
                "Screener page fetch failed: HTTP {}",
                response.status()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| EarningsError::Network(e.to_string()))
    }
}

/// One hit from the Screener.in search API.
#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: String,
}

/// Resolves a possibly relative href against the site root.
fn absolute_url(href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}/{}", BASE_URL.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

/// Parses the concalls section of a company page into documents.
///
/// Pure over the page HTML: finds transcript and presentation anchors in the
/// documents section, takes each entry's period text from its enclosing list
/// item ("Q3FY26", "Jan 2026"), and labels unparseable entries
/// `"Unknown"`/empty rather than dropping them.
fn parse_company_page(html: &str, fallback_name: &str, filter: &DocTypeFilter) -> Vec<Document> {
    let page = Html::parse_document(html);

    let company = page
        .select(&COMPANY_NAME_SELECTOR)
        .next()
        .map(collect_text)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| fallback_name.to_string());

    let Some(section) = page
        .select(&DOCUMENTS_SECTION_SELECTOR)
        .next()
        .or_else(|| page.select(&DOCUMENTS_FALLBACK_SELECTOR).next())
    else {
        debug!(company = %company, "No concalls section found");
        return Vec::new();
    };

    let mut documents = Vec::new();
    let mut seen_urls: HashSet<String> = HashSet::new();

    for anchor in section.select(&ANCHOR_SELECTOR) {
        let text = collect_text(anchor);
        let doc_type = if TRANSCRIPT_TEXT_RE.is_match(&text) {
            DocType::Transcript
        } else if PRESENTATION_TEXT_RE.is_match(&text) {
            DocType::Presentation
        } else {
            continue;
        };
        if !filter.includes(doc_type) {
            continue;
        }

        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if href.is_empty() || !seen_urls.insert(href.to_string()) {
            continue;
        }

        let context = enclosing_list_item_text(anchor).unwrap_or_default();
        let (quarter, year) = parse_period(&context, FiscalYearType::IndianFiscal)
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()));

        documents.push(Document::new(
            company.clone(),
            quarter,
            year,
            doc_type,
            absolute_url(href),
            "screener",
        ));
    }

    documents
}

fn collect_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the nearest `<li>` ancestor, which carries the period label.
fn enclosing_list_item_text(anchor: ElementRef<'_>) -> Option<String> {
    anchor
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "li")
        .map(collect_text)
}

#[async_trait]
impl EarningsSource for ScreenerSource {
    fn region(&self) -> Region {
        Region::India
    }

    fn source_name(&self) -> &str {
        "screener"
    }

    fn priority(&self) -> u8 {
        2
    }

    fn fiscal_year_type(&self) -> FiscalYearType {
        FiscalYearType::IndianFiscal
    }

    async fn search_company(&self, query: &str) -> Result<Option<CompanyMatch>> {
        let Some(hit) = self.search_url(query).await? else {
            return Ok(None);
        };

        Ok(Some(CompanyMatch {
            name: hit.name.unwrap_or_else(|| query.to_string()),
            symbol: None,
            identifier: None,
            url: absolute_url(&hit.url),
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
        let hit = match self.search_url(company).await {
            Ok(Some(hit)) => hit,
            Ok(None) => {
                debug!(company, "Company not found on Screener.in");
                return Ok(Vec::new());
            }
            Err(e) => {
                warn!(company, error = %e, "Screener search error");
                return Ok(Vec::new());
            }
        };

        let html = match self.fetch_company_page(&absolute_url(&hit.url)).await {
            Ok(html) => html,
            Err(e) => {
                // Partial results, not a pipeline error.
                warn!(company, error = %e, "Error fetching from Screener.in");
                return Ok(Vec::new());
            }
        };

        let documents = parse_company_page(&html, company, filter);
        Ok(latest_quarters(documents, count))
    }
}
