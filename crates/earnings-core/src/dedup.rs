//! Two-pass deduplication of candidate documents.
//!
//! When several sources are queried for the same company, the same underlying
//! document shows up more than once: byte-identical URLs mirrored by
//! aggregators, or the same quarter's transcript hosted at different URLs.
//! Reconciliation runs two passes:
//!
//! 1. URL pass - identical canonical URLs are collapsed first, keeping the
//!    most authoritative source.
//! 2. Semantic pass - survivors sharing a
//!    `(normalized company, quarter, year, doc_type)` identity are collapsed
//!    the same way.
//!
//! The URL pass runs first so that an accidental URL collision is resolved by
//! source priority before semantic grouping, independent of the semantic key.
//! This ordering is deliberately preserved even though it lets a
//! lower-priority source with a unique URL win a semantic slot in rare
//! collision cases.

use std::collections::HashMap;

use crate::normalize::normalize_company_name;
use crate::types::{DocType, Document};

/// Source preference for duplicate resolution; lower value wins.
///
/// Official exchange filings beat company IR pages and regulatory filings,
/// which beat aggregators. Unknown sources rank last.
#[must_use]
pub fn source_priority(source: &str) -> u8 {
    match source {
        "bse" | "nse" => 0,
        "company_ir" | "edgar" | "tdnet" | "dart" | "cninfo" => 1,
        "screener" => 2,
        "trendlyne" => 3,
        _ => 99,
    }
}

/// Canonical form of a URL for duplicate detection: lowercased, trailing
/// slash stripped.
fn canonical_url(url: &str) -> String {
    url.trim().to_lowercase().trim_end_matches('/').to_string()
}

type SemanticKey = (String, String, String, DocType);

fn semantic_key(doc: &Document) -> SemanticKey {
    (
        normalize_company_name(&doc.company).to_lowercase(),
        doc.quarter.clone(),
        doc.year.clone(),
        doc.doc_type,
    )
}

/// Removes duplicate documents, preferring authoritative sources.
///
/// Output content is deterministic for a given input multiset; among records
/// with equal priority the first encountered is kept. Never errors; an empty
/// input yields an empty output.
#[must_use]
pub fn deduplicate(documents: Vec<Document>) -> Vec<Document> {
    let survivors = keep_preferred(documents, |doc| canonical_url(&doc.url));
    keep_preferred(survivors, semantic_key)
}

/// One grouping pass: within each key group, keep the record whose source has
/// the lowest priority value, first-encountered winning ties.
fn keep_preferred<K, F>(documents: Vec<Document>, key_fn: F) -> Vec<Document>
where
    K: std::hash::Hash + Eq,
    F: Fn(&Document) -> K,
{
    let mut winners: HashMap<K, usize> = HashMap::with_capacity(documents.len());

    for (index, doc) in documents.iter().enumerate() {
        let priority = source_priority(&doc.source);
        winners
            .entry(key_fn(doc))
            .and_modify(|held| {
                if priority < source_priority(&documents[*held].source) {
                    *held = index;
                }
            })
            .or_insert(index);
    }

    // Emit in input order so the result is stable, not hash-map order.
    documents
        .iter()
        .enumerate()
        .filter(|(index, doc)| winners.get(&key_fn(doc)) == Some(index))
        .map(|(_, doc)| doc.clone())
        .collect()
}
