//! Fuzzy company-name matching.
//!
//! Ranks candidate names against a user query with weighted-ratio semantics:
//! the score rewards substring containment and token reordering, not just raw
//! edit distance, so "Lupin" scores high against "Lupin Limited" and
//! "Motors Tata" against "Tata Motors". Scores are integers in `[0, 100]`.

use strsim::normalized_levenshtein;

use crate::normalize::normalize_company_name;

/// Maximum number of ranked results returned before threshold filtering.
const MAX_RESULTS: usize = 10;

/// Default minimum score for a candidate to be reported.
pub const DEFAULT_THRESHOLD: u32 = 60;

/// Ranks `candidates` against `query`, best first.
///
/// The query and every candidate are normalized via
/// [`normalize_company_name`] before scoring, so "Lupin" matches
/// "Lupin Limited" with a perfect score. Only candidates scoring at least
/// `threshold` are returned, at most ten of them, in descending score order
/// (ties keep candidate order). An empty candidate list yields an empty
/// result, never an error.
#[must_use]
pub fn match_companies<'a, I>(query: &str, candidates: I, threshold: u32) -> Vec<(String, u32)>
where
    I: IntoIterator<Item = &'a str>,
{
    let query_norm = normalize_company_name(query).to_lowercase();
    if query_norm.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(String, u32)> = candidates
        .into_iter()
        .map(|candidate| {
            let candidate_norm = normalize_company_name(candidate).to_lowercase();
            (candidate.to_string(), similarity(&query_norm, &candidate_norm))
        })
        .collect();

    // Stable sort keeps input order among equal scores.
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.truncate(MAX_RESULTS);
    scored.retain(|(_, score)| *score >= threshold);
    scored
}

/// Returns the best-scoring candidate at or above `threshold`, if any.
#[must_use]
pub fn find_best_match<'a, I>(query: &str, candidates: I, threshold: u32) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    match_companies(query, candidates, threshold)
        .into_iter()
        .next()
        .map(|(name, _)| name)
}

/// Weighted similarity of two already-normalized, lowercased names.
fn similarity(a: &str, b: &str) -> u32 {
    if a == b {
        return 100;
    }
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let full = normalized_levenshtein(a, b) * 100.0;
    let partial = containment_score(a, b);
    let token_sort = normalized_levenshtein(&sorted_tokens(a), &sorted_tokens(b)) * 100.0;

    full.max(partial).max(token_sort).round().clamp(0.0, 100.0) as u32
}

/// Scores substring containment: the shorter string appearing whole inside
/// the longer one is strong evidence of identity regardless of extra
/// trailing tokens.
fn containment_score(a: &str, b: &str) -> f64 {
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.len() < 2 || !long.contains(short) {
        return 0.0;
    }
    // 85 base, scaled up to 100 as the lengths converge.
    85.0 + 15.0 * (short.len() as f64 / long.len() as f64)
}

fn sorted_tokens(s: &str) -> String {
    let mut tokens: Vec<&str> = s.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_after_normalization_scores_100() {
        let results = match_companies("Lupin", ["Lupin Limited"].into_iter(), 60);
        assert_eq!(results, vec![("Lupin Limited".to_string(), 100)]);
    }

    #[test]
    fn test_ranking_and_threshold() {
        let candidates = ["Lupin Limited", "Sun Pharma"];
        let results = match_companies("Lupin", candidates.into_iter(), 60);
        assert_eq!(results[0].0, "Lupin Limited");
        assert!(results.iter().all(|(name, _)| name != "Sun Pharma"));
    }

    #[test]
    fn test_containment_scores_high() {
        // Normalization does not remove "Industries", so this exercises the
        // containment component rather than exact equality.
        let score = similarity("reliance", "reliance industries");
        assert!(score > 80, "containment score was {score}");
    }

    #[test]
    fn test_token_reordering_scores_high() {
        let score = similarity("motors tata", "tata motors");
        assert_eq!(score, 100);
    }

    #[test]
    fn test_disjoint_strings_score_low() {
        let score = similarity("infosys", "zee entertainment");
        assert!(score < 40, "disjoint score was {score}");
    }

    #[test]
    fn test_empty_candidates() {
        assert!(match_companies("Lupin", [].into_iter(), 60).is_empty());
        assert_eq!(find_best_match("Lupin", [].into_iter(), 60), None);
    }

    #[test]
    fn test_at_most_ten_results() {
        let candidates: Vec<String> = (0..25).map(|i| format!("Lupin Unit {i}")).collect();
        let refs: Vec<&str> = candidates.iter().map(String::as_str).collect();
        let results = match_companies("Lupin Unit", refs.into_iter(), 0);
        assert!(results.len() <= 10);
    }

    #[test]
    fn test_find_best_match() {
        let best = find_best_match("Tata Motors Ltd", ["Tata Motors", "Tata Steel"].into_iter(), 60);
        assert_eq!(best.as_deref(), Some("Tata Motors"));
    }
}
