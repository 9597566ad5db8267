//! Orchestration of source adapters into a reconciled document list.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use earnings_core::{CompanyMatch, DocTypeFilter, Document, Region, deduplicate};

use crate::registry::SourceRegistry;

/// Description of a region and the sources registered for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionInfo {
    /// Region identifier (`"india"`, `"us"`, ...).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Fiscal-year convention description.
    pub fiscal_year: String,
    /// Names of the registered sources, in priority order.
    pub sources: Vec<String>,
}

/// Fans queries out to a region's sources and reconciles the results.
///
/// Adapter failures are logged and skipped so one broken endpoint never
/// empties the whole result; whatever the sources return is merged and
/// deduplicated before being handed to the caller.
#[derive(Clone, Debug)]
pub struct EarningsService {
    registry: Arc<SourceRegistry>,
}

impl EarningsService {
    /// Creates a service over a built registry.
    #[must_use]
    pub const fn new(registry: Arc<SourceRegistry>) -> Self {
        Self { registry }
    }

    /// Access to the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &SourceRegistry {
        &self.registry
    }

    /// Searches for a company across a region's sources (or every source
    /// when `region` is `None`), in priority order.
    pub async fn search_company(&self, query: &str, region: Option<Region>) -> Vec<CompanyMatch> {
        let sources = match region {
            Some(region) => self.registry.sources_for(region).to_vec(),
            None => self.registry.all_sources(),
        };

        let mut matches = Vec::new();
        for source in sources {
            match source.search_company(query).await {
                Ok(Some(found)) => matches.push(found),
                Ok(None) => {}
                Err(e) => {
                    warn!(source = source.source_name(), error = %e, "Company search failed");
                }
            }
        }
        matches
    }

    /// Fetches earnings documents for a company from every source of a
    /// region, merges the raw records, and deduplicates them.
    pub async fn fetch_documents(
        &self,
        company: &str,
        region: Region,
        count: usize,
        filter: &DocTypeFilter,
    ) -> Vec<Document> {
        let mut raw: Vec<Document> = Vec::new();

        for source in self.registry.sources_for(region) {
            match source.fetch_documents(company, count, filter).await {
                Ok(documents) => {
                    debug!(
                        source = source.source_name(),
                        company,
                        count = documents.len(),
                        "Source returned documents"
                    );
                    raw.extend(documents);
                }
                Err(e) => {
                    warn!(
                        source = source.source_name(),
                        company,
                        error = %e,
                        "Source failed, continuing with remaining sources"
                    );
                }
            }
        }

        deduplicate(raw)
    }

    /// Lists every region that has registered sources.
    #[must_use]
    pub fn available_regions(&self) -> Vec<RegionInfo> {
        self.registry
            .regions()
            .into_iter()
            .map(|region| {
                let (name, fiscal_year) = match region {
                    Region::India => ("India", "April-March (FY ends in named year)"),
                    Region::Us => ("United States", "Calendar year"),
                    Region::Japan => ("Japan", "April-March"),
                    Region::Korea => ("Korea", "Calendar year"),
                    Region::China => ("China", "Calendar year"),
                };
                RegionInfo {
                    id: region.as_str().to_string(),
                    name: name.to_string(),
                    fiscal_year: fiscal_year.to_string(),
                    sources: self
                        .registry
                        .sources_for(region)
                        .iter()
                        .map(|s| s.source_name().to_string())
                        .collect(),
                }
            })
            .collect()
    }
}
