//! CSV-backed scrip store for company autocomplete.
//!
//! The store loads an exchange scrip list (name, symbol, ISIN) into an
//! in-memory index keyed by normalized company name and serves prefix-based
//! suggestions. The index is rebuilt wholesale whenever the backing file's
//! modification time changes; a missing file degrades to empty results
//! rather than failing the caller.

use std::collections::BTreeSet;
use std::collections::btree_map::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::normalize::normalize_company_name;

/// One coalesced scrip entry.
///
/// Duplicate CSV rows sharing a normalized name are merged into a single
/// entry carrying every name variant seen as an alias.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScripEntry {
    /// Display name from the first row seen for this identity.
    pub name: String,
    /// Ticker symbol, backfilled from later rows when the first lacked one.
    pub symbol: String,
    /// ISIN or other exchange identifier, backfilled like the symbol.
    pub isin: String,
    /// Normalized lowercase name, the grouping and sort key.
    pub normalized_name: String,
    /// Lowercased symbol for prefix matching.
    pub normalized_symbol: String,
    /// Lowercased name variants (raw and normalized) seen across rows.
    pub aliases: BTreeSet<String>,
}

/// An autocomplete suggestion served by [`ScripStore::suggest`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Company display name.
    pub name: String,
    /// Ticker symbol, empty when unknown.
    pub symbol: String,
    /// ISIN, empty when unknown.
    pub isin: String,
    /// Rendered label: `"{name} ({symbol})"` or `"{name}"`.
    pub label: String,
}

/// Loaded index plus the file state it was built from.
#[derive(Debug, Default)]
struct Index {
    entries: Arc<Vec<ScripEntry>>,
    mtime: Option<SystemTime>,
    loaded_once: bool,
    warned_missing: bool,
}

/// In-memory, lazily reloaded scrip list.
///
/// Reload is mtime-gated and happens inside a write lock; readers take a
/// cheap clone of the `Arc`'d entry list, so a reload never exposes a torn
/// index to concurrent callers.
#[derive(Debug)]
pub struct ScripStore {
    path: PathBuf,
    index: RwLock<Index>,
}

impl ScripStore {
    /// Creates a store backed by the CSV file at `path`. The file is not
    /// read until the first query.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            index: RwLock::new(Index::default()),
        }
    }

    /// Returns prefix-based suggestions for `query`, at most `limit` of them.
    ///
    /// A candidate matches when the case-folded query is a prefix of any of
    /// its name aliases or of its symbol. Entries are scanned in normalized
    /// name order; duplicate labels are suppressed.
    #[must_use]
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let entries = self.current_entries();
        let mut seen_labels: BTreeSet<String> = BTreeSet::new();
        let mut matches = Vec::new();

        for entry in entries.iter() {
            let name_hit = entry.aliases.iter().any(|alias| alias.starts_with(&query));
            let symbol_hit =
                !entry.normalized_symbol.is_empty() && entry.normalized_symbol.starts_with(&query);
            if !name_hit && !symbol_hit {
                continue;
            }

            let label = if entry.symbol.is_empty() {
                entry.name.clone()
            } else {
                format!("{} ({})", entry.name, entry.symbol)
            };
            if !seen_labels.insert(label.clone()) {
                continue;
            }

            matches.push(Suggestion {
                name: entry.name.clone(),
                symbol: entry.symbol.clone(),
                isin: entry.isin.clone(),
                label,
            });
            if matches.len() >= limit {
                break;
            }
        }

        matches
    }

    /// Returns the entry list, reloading first if the backing file changed.
    fn current_entries(&self) -> Arc<Vec<ScripEntry>> {
        self.reload_if_changed();
        self.index
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .entries
            .clone()
    }

    /// Rebuilds the index when the file's mtime differs from the last load.
    ///
    /// A vanished file keeps the previously loaded index (stale reads are
    /// allowed) and logs a warning once per detected absence; on the very
    /// first load attempt absence yields an empty store.
    fn reload_if_changed(&self) {
        let mut index = self
            .index
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let mtime = match std::fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(mtime) => mtime,
            Err(_) => {
                if !index.loaded_once {
                    index.entries = Arc::new(Vec::new());
                    index.loaded_once = true;
                }
                if !index.warned_missing {
                    warn!(path = %self.path.display(), "Scrip file missing");
                    index.warned_missing = true;
                }
                return;
            }
        };
        index.warned_missing = false;

        if index.loaded_once && index.mtime == Some(mtime) {
            return;
        }

        match load_entries(&self.path) {
            Ok(entries) => {
                debug!(
                    path = %self.path.display(),
                    count = entries.len(),
                    "Loaded scrip list"
                );
                index.entries = Arc::new(entries);
                index.mtime = Some(mtime);
                index.loaded_once = true;
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to load scrip list");
                index.entries = Arc::new(Vec::new());
                index.mtime = None;
                index.loaded_once = true;
            }
        }
    }
}

/// Parses the CSV and coalesces rows by normalized name.
///
/// Header columns are matched case-insensitively: `Company name` or `Name`,
/// `Symbol`, `ISIN`; anything else is ignored.
fn load_entries(path: &Path) -> csv::Result<Vec<ScripEntry>> {
    let mut reader = csv::Reader::from_path(path)?;

    let headers = reader.headers()?.clone();
    let column = |wanted: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|h| wanted.contains(&h.trim().to_lowercase().as_str()))
    };
    let name_col = column(&["company name", "name"]);
    let symbol_col = column(&["symbol"]);
    let isin_col = column(&["isin"]);

    let mut grouped: BTreeMap<String, ScripEntry> = BTreeMap::new();

    for record in reader.records() {
        let record = record?;
        let field = |col: Option<usize>| {
            col.and_then(|i| record.get(i))
                .map(str::trim)
                .unwrap_or("")
                .to_string()
        };

        let name = field(name_col);
        if name.is_empty() {
            continue;
        }
        let symbol = field(symbol_col);
        let isin = field(isin_col);

        let normalized_name = normalize_company_name(&name).to_lowercase();
        let entry = grouped
            .entry(normalized_name.clone())
            .or_insert_with(|| ScripEntry {
                name: name.clone(),
                symbol: String::new(),
                isin: String::new(),
                normalized_name: normalized_name.clone(),
                normalized_symbol: String::new(),
                aliases: BTreeSet::new(),
            });

        entry.aliases.insert(name.to_lowercase());
        entry.aliases.insert(normalized_name);
        // Backfill identifiers from later duplicate rows, never overwrite.
        if entry.symbol.is_empty() && !symbol.is_empty() {
            entry.symbol = symbol.clone();
            entry.normalized_symbol = symbol.to_lowercase();
        }
        if entry.isin.is_empty() && !isin.is_empty() {
            entry.isin = isin;
        }
    }

    // BTreeMap iteration is already sorted by normalized name.
    Ok(grouped.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "Company name,Symbol,ISIN").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_suggest_by_name_prefix() {
        let file = write_csv(&[
            "ABB Ltd.,ABB,INE117A01022",
            "Aegis Logistics Ltd.,AEGISLOG,INE208C01025",
        ]);
        let store = ScripStore::new(file.path());

        let labels: Vec<String> = store
            .suggest("AB", 20)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert!(labels.contains(&"ABB Ltd. (ABB)".to_string()));
    }

    #[test]
    fn test_suggest_by_symbol_prefix() {
        let file = write_csv(&[
            "ABB Ltd.,ABB,INE117A01022",
            "Aegis Logistics Ltd.,AEGISLOG,INE208C01025",
        ]);
        let store = ScripStore::new(file.path());

        let labels: Vec<String> = store
            .suggest("AEGIS", 20)
            .into_iter()
            .map(|s| s.label)
            .collect();
        assert!(labels.contains(&"Aegis Logistics Ltd. (AEGISLOG)".to_string()));
    }

    #[test]
    fn test_label_without_symbol() {
        let file = write_csv(&["Borosil Renewables Ltd.,,"]);
        let store = ScripStore::new(file.path());

        let suggestions = store.suggest("boro", 20);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].label, "Borosil Renewables Ltd.");
    }

    #[test]
    fn test_duplicate_rows_coalesce_and_backfill() {
        let file = write_csv(&[
            "Lupin Ltd.,,INE326A01037",
            "Lupin Limited,LUPIN,",
        ]);
        let store = ScripStore::new(file.path());

        let suggestions = store.suggest("lupin", 20);
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].symbol, "LUPIN");
        assert_eq!(suggestions[0].isin, "INE326A01037");
    }

    #[test]
    fn test_missing_file_is_empty_not_error() {
        let store = ScripStore::new("/nonexistent/scrips.csv");
        assert!(store.suggest("AB", 20).is_empty());
    }

    #[test]
    fn test_missing_file_flagged_on_first_detection() {
        let store = ScripStore::new("/nonexistent/scrips.csv");
        assert!(store.suggest("AB", 20).is_empty());

        // The very first absence is already counted as warned, so repeated
        // queries stay on the once-per-absence path.
        let index = store.index.read().unwrap();
        assert!(index.loaded_once);
        assert!(index.warned_missing);
    }

    #[test]
    fn test_empty_query() {
        let file = write_csv(&["ABB Ltd.,ABB,INE117A01022"]);
        let store = ScripStore::new(file.path());
        assert!(store.suggest("   ", 20).is_empty());
    }

    #[test]
    fn test_limit_respected() {
        let rows: Vec<String> = (0..30).map(|i| format!("Alpha Metals {i} Ltd.,AM{i},")).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let file = write_csv(&refs);
        let store = ScripStore::new(file.path());

        assert_eq!(store.suggest("alpha", 5).len(), 5);
    }

    #[test]
    fn test_reload_on_mtime_change_and_stale_reuse() {
        let file = write_csv(&["ABB Ltd.,ABB,INE117A01022"]);
        let store = ScripStore::new(file.path());
        assert_eq!(store.suggest("abb", 20).len(), 1);

        let original_mtime = std::fs::metadata(file.path()).unwrap().modified().unwrap();

        // Rewrite with an extra row but pin the mtime back: the stale index
        // must be reused.
        let mut handle = std::fs::OpenOptions::new()
            .append(true)
            .open(file.path())
            .unwrap();
        writeln!(handle, "Aarti Industries Ltd.,AARTIIND,INE769A01020").unwrap();
        handle.flush().unwrap();
        handle.set_modified(original_mtime).unwrap();
        drop(handle);

        assert!(store.suggest("aarti", 20).is_empty());

        // Bump the mtime forward: the next call must see the new row.
        let file_handle = std::fs::OpenOptions::new()
            .append(true)
            .open(file.path())
            .unwrap();
        file_handle
            .set_modified(original_mtime + std::time::Duration::from_secs(5))
            .unwrap();
        drop(file_handle);

        assert_eq!(store.suggest("aarti", 20).len(), 1);
    }
}
