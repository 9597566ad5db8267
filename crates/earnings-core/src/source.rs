//! The source-adapter contract.
//!
//! Every (region, provider) pairing implements [`EarningsSource`]: search for
//! a company, then fetch its recent earnings documents. Adapters own their
//! network behavior entirely; retries and backoff happen inside the adapter,
//! and a failing endpoint surfaces as partial or empty results rather than a
//! pipeline error.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;

use crate::error::Result;
use crate::types::{CompanyMatch, DocTypeFilter, Document, FiscalYearType, Region};

/// A provider of earnings documents for one region.
///
/// Implementations must tag every produced [`Document`] with their own
/// [`source_name`](Self::source_name) and use the quarter/year labelling
/// convention of their [`fiscal_year_type`](Self::fiscal_year_type).
#[async_trait]
pub trait EarningsSource: Send + Sync + Debug {
    /// Region this source covers.
    fn region(&self) -> Region;

    /// Stable identifier of this source (e.g. `"screener"`, `"edgar"`).
    fn source_name(&self) -> &str;

    /// Preference rank for duplicate resolution; lower is preferred.
    fn priority(&self) -> u8;

    /// Fiscal-year labelling convention this source reports in.
    fn fiscal_year_type(&self) -> FiscalYearType;

    /// Searches for a company by name or ticker.
    ///
    /// Returns `Ok(None)` when the source does not know the company.
    async fn search_company(&self, query: &str) -> Result<Option<CompanyMatch>>;

    /// Fetches earnings documents for a company, limited to the most recent
    /// `count` fiscal quarters and the kinds allowed by `filter`.
    async fn fetch_documents(
        &self,
        company: &str,
        count: usize,
        filter: &DocTypeFilter,
    ) -> Result<Vec<Document>>;
}

/// Keeps the documents of the most recent `count` fiscal quarters.
///
/// Documents are grouped by `(quarter, year)` and whole groups are kept, so
/// a quarter's transcript and presentation always travel together. Groups
/// are ordered most recent first; `"FY"` annual entries sort after Q4 within
/// a year, `"Unknown"` quarters last.
#[must_use]
pub fn latest_quarters(documents: Vec<Document>, count: usize) -> Vec<Document> {
    let mut groups: HashMap<(String, String), Vec<Document>> = HashMap::new();
    let mut order: Vec<(String, String)> = Vec::new();

    for doc in documents {
        let key = (doc.quarter.clone(), doc.year.clone());
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(doc);
    }

    order.sort_by_key(|(quarter, year)| {
        let year_rank = year
            .strip_prefix("FY")
            .unwrap_or(year)
            .parse::<i32>()
            .unwrap_or(-9999);
        let quarter_rank = match quarter.as_str() {
            "Q1" => 1,
            "Q2" => 2,
            "Q3" => 3,
            "Q4" => 4,
            "FY" => 5,
            _ => 0,
        };
        (-year_rank, -quarter_rank)
    });

    order
        .into_iter()
        .take(count)
        .flat_map(|key| groups.remove(&key).unwrap_or_default())
        .collect()
}
