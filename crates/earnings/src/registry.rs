//! Source registry for managing per-region earnings document sources.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use earnings_core::{EarningsSource, Region};

/// Registry of source adapters, keyed by region.
///
/// The registry is an explicit object built once at startup and passed by
/// reference to the orchestration layer; registration is a composition step,
/// not an import-time side effect. Within a region, sources are kept sorted
/// by priority (lower = preferred) and registration is idempotent by source
/// name.
///
/// # Example
///
/// ```rust,ignore
/// use earnings::{Region, SourceRegistry};
///
/// let registry = SourceRegistry::new()
///     .with_screener()
///     .with_edgar("MyApp/1.0 (contact@example.com)");
///
/// for source in registry.sources_for(Region::India) {
///     println!("{}", source.source_name());
/// }
/// ```
#[derive(Default)]
pub struct SourceRegistry {
    sources: HashMap<Region, Vec<Arc<dyn EarningsSource>>>,
}

impl std::fmt::Debug for SourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (region, sources) in &self.sources {
            map.entry(
                region,
                &sources
                    .iter()
                    .map(|s| s.source_name().to_string())
                    .collect::<Vec<_>>(),
            );
        }
        map.finish()
    }
}

impl SourceRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source under its own region.
    ///
    /// A source whose name is already registered for the region is ignored;
    /// the region's list stays sorted by priority.
    pub fn register(&mut self, source: Arc<dyn EarningsSource>) {
        let region_sources = self.sources.entry(source.region()).or_default();
        if region_sources
            .iter()
            .any(|s| s.source_name() == source.source_name())
        {
            return;
        }
        debug!(
            source = source.source_name(),
            region = %source.region(),
            "Registering earnings source"
        );
        region_sources.push(source);
        region_sources.sort_by_key(|s| s.priority());
    }

    /// All sources for a region, sorted by priority. Empty when the region
    /// has none registered.
    #[must_use]
    pub fn sources_for(&self, region: Region) -> &[Arc<dyn EarningsSource>] {
        self.sources.get(&region).map_or(&[], Vec::as_slice)
    }

    /// All registered sources across all regions.
    #[must_use]
    pub fn all_sources(&self) -> Vec<Arc<dyn EarningsSource>> {
        self.sources.values().flatten().cloned().collect()
    }

    /// Regions that have at least one registered source.
    #[must_use]
    pub fn regions(&self) -> Vec<Region> {
        let mut regions: Vec<Region> = self.sources.keys().copied().collect();
        regions.sort_by_key(|r| r.as_str());
        regions
    }

    /// Finds a source by its name, across regions.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<Arc<dyn EarningsSource>> {
        self.sources
            .values()
            .flatten()
            .find(|s| s.source_name() == name)
            .cloned()
    }

    // Builder methods for easy setup with specific sources

    /// Add the Screener.in source for Indian companies.
    #[cfg(feature = "screener")]
    #[must_use]
    pub fn with_screener(mut self) -> Self {
        self.register(Arc::new(earnings_screener::ScreenerSource::new()));
        self
    }

    /// Add the SEC EDGAR source for US companies.
    ///
    /// The SEC requires a descriptive user agent, e.g.
    /// `"MyApp/1.0 (contact@example.com)"`.
    #[cfg(feature = "edgar")]
    #[must_use]
    pub fn with_edgar(mut self, user_agent: &str) -> Self {
        self.register(Arc::new(earnings_edgar::EdgarSource::new(user_agent)));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use earnings_core::{
        CompanyMatch, DocTypeFilter, Document, FiscalYearType, Result as CoreResult,
    };

    #[derive(Debug)]
    struct StubSource {
        name: &'static str,
        priority: u8,
        region: Region,
    }

    #[async_trait]
    impl EarningsSource for StubSource {
        fn region(&self) -> Region {
            self.region
        }

        fn source_name(&self) -> &str {
            self.name
        }

        fn priority(&self) -> u8 {
            self.priority
        }

        fn fiscal_year_type(&self) -> FiscalYearType {
            FiscalYearType::IndianFiscal
        }

        async fn search_company(&self, _query: &str) -> CoreResult<Option<CompanyMatch>> {
            Ok(None)
        }

        async fn fetch_documents(
            &self,
            _company: &str,
            _count: usize,
            _filter: &DocTypeFilter,
        ) -> CoreResult<Vec<Document>> {
            Ok(Vec::new())
        }
    }

    fn stub(name: &'static str, priority: u8, region: Region) -> Arc<dyn EarningsSource> {
        Arc::new(StubSource {
            name,
            priority,
            region,
        })
    }

    #[test]
    fn test_sources_sorted_by_priority() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("aggregator", 3, Region::India));
        registry.register(stub("exchange", 0, Region::India));

        let names: Vec<&str> = registry
            .sources_for(Region::India)
            .iter()
            .map(|s| s.source_name())
            .collect();
        assert_eq!(names, vec!["exchange", "aggregator"]);
    }

    #[test]
    fn test_registration_idempotent_by_name() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("screener", 2, Region::India));
        registry.register(stub("screener", 5, Region::India));

        assert_eq!(registry.sources_for(Region::India).len(), 1);
        assert_eq!(registry.sources_for(Region::India)[0].priority(), 2);
    }

    #[test]
    fn test_unknown_region_is_empty() {
        let registry = SourceRegistry::new();
        assert!(registry.sources_for(Region::Japan).is_empty());
    }

    #[test]
    fn test_by_name_across_regions() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("screener", 2, Region::India));
        registry.register(stub("edgar", 1, Region::Us));

        assert!(registry.by_name("edgar").is_some());
        assert!(registry.by_name("tdnet").is_none());
    }

    #[test]
    fn test_regions_listed() {
        let mut registry = SourceRegistry::new();
        registry.register(stub("screener", 2, Region::India));
        registry.register(stub("edgar", 1, Region::Us));

        assert_eq!(registry.regions(), vec![Region::India, Region::Us]);
    }
}
