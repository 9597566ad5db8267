#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and the reconciliation pipeline for earnings documents:
//!
//! - [`Document`](types::Document) - The canonical record flowing through
//!   the pipeline
//! - [`EarningsSource`](source::EarningsSource) - Contract implemented by
//!   per-region source adapters
//! - [`normalize_company_name`](normalize::normalize_company_name) -
//!   Company-name canonicalization
//! - [`parse_period`](period::parse_period) - Fiscal-period extraction
//! - [`match_companies`](fuzzy::match_companies) - Fuzzy name ranking
//! - [`deduplicate`](dedup::deduplicate) - Two-pass duplicate reconciliation
//! - [`ScripStore`](scrip::ScripStore) - CSV-backed autocomplete index

/// Two-pass deduplication of candidate documents.
pub mod dedup;
/// Error types for earnings document operations.
pub mod error;
/// Fuzzy company-name matching.
pub mod fuzzy;
/// Company-name normalization.
pub mod normalize;
/// Fiscal-period parsing from free text.
pub mod period;
/// CSV-backed scrip store for company autocomplete.
pub mod scrip;
/// The source-adapter contract.
pub mod source;
/// Core data types (Document, Region, DocType, etc.).
pub mod types;

// Re-export commonly used items at crate root
pub use dedup::{deduplicate, source_priority};
pub use error::{EarningsError, Result};
pub use fuzzy::{DEFAULT_THRESHOLD, find_best_match, match_companies};
pub use normalize::normalize_company_name;
pub use period::parse_period;
pub use scrip::{ScripEntry, ScripStore, Suggestion};
pub use source::{EarningsSource, latest_quarters};
pub use types::{CompanyMatch, DocType, DocTypeFilter, Document, FiscalYearType, Region};
