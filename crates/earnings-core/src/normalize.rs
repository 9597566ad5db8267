//! Company-name normalization.
//!
//! Sources report the same company under different corporate styles
//! ("Tata Motors Ltd", "Tata Motors Limited", "TATA MOTORS LTD."). Stripping
//! the entity suffix yields the canonical key used for fuzzy matching and
//! semantic deduplication.

/// Corporate-entity suffixes stripped from the end of a company name.
///
/// Ordered longest-first so the most specific suffix wins when one is a
/// prefix of another ("Corp" vs "Corporation").
const ENTITY_SUFFIXES: &[&str] = &[
    "international",
    "corporation",
    "holdings",
    "company",
    "limited",
    "group",
    "corp",
    "intl",
    "ltd",
    "inc",
    "plc",
    "co",
    "nv",
    "sa",
    "ag",
    "se",
];

/// Normalizes a company name by stripping trailing corporate-entity suffixes
/// and collapsing whitespace.
///
/// Each suffix is stripped at most once per call, matching is
/// case-insensitive, and a trailing period after a suffix is removed with it.
/// The function is pure and idempotent:
/// `normalize_company_name("Tata Motors Limited")` and
/// `normalize_company_name("Tata Motors Ltd.")` both yield `"Tata Motors"`.
#[must_use]
pub fn normalize_company_name(name: &str) -> String {
    let mut current = name.trim().to_string();
    let mut used = [false; ENTITY_SUFFIXES.len()];

    loop {
        let trimmed = current.trim_end().trim_end_matches('.').trim_end();

        let stripped = ENTITY_SUFFIXES.iter().enumerate().find_map(|(i, suffix)| {
            if used[i] || trimmed.len() <= suffix.len() {
                return None;
            }
            let cut = trimmed.len() - suffix.len();
            let (prefix, tail) = trimmed.split_at_checked(cut)?;
            if !tail.eq_ignore_ascii_case(suffix) {
                return None;
            }
            // Suffix must be a whole trailing word, not the entire name.
            if prefix.trim_end().is_empty() || !prefix.ends_with(char::is_whitespace) {
                return None;
            }
            Some((i, prefix.trim_end().to_string()))
        });

        match stripped {
            Some((i, shorter)) => {
                used[i] = true;
                current = shorter;
            }
            None => break,
        }
    }

    current.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_common_suffixes() {
        assert_eq!(normalize_company_name("Tata Motors Limited"), "Tata Motors");
        assert_eq!(normalize_company_name("Tata Motors Ltd."), "Tata Motors");
        assert_eq!(normalize_company_name("Apple Inc"), "Apple");
        assert_eq!(normalize_company_name("Siemens AG"), "Siemens");
    }

    #[test]
    fn test_idempotent() {
        for name in [
            "Tata Motors Limited",
            "Reliance Industries Ltd",
            "Lupin",
            "  HDFC   Bank  Ltd ",
        ] {
            let once = normalize_company_name(name);
            assert_eq!(normalize_company_name(&once), once);
        }
    }

    #[test]
    fn test_suffix_variants_agree() {
        assert_eq!(
            normalize_company_name("Tata Motors Limited"),
            normalize_company_name("Tata Motors Ltd.")
        );
    }

    #[test]
    fn test_longest_suffix_wins() {
        // "Corporation" must not be left as "Corporat" by a "Co" match.
        assert_eq!(normalize_company_name("Oracle Corporation"), "Oracle");
    }

    #[test]
    fn test_stacked_suffixes_each_stripped_once() {
        assert_eq!(normalize_company_name("Acme Holdings Ltd"), "Acme");
    }

    #[test]
    fn test_suffix_requires_word_boundary() {
        // "Wipro" ends in "ro", not a suffix; "Cosco" ends with "co" but
        // without a word boundary.
        assert_eq!(normalize_company_name("Cosco"), "Cosco");
        assert_eq!(normalize_company_name("Vedanta"), "Vedanta");
    }

    #[test]
    fn test_bare_suffix_left_alone() {
        assert_eq!(normalize_company_name("SA"), "SA");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(normalize_company_name("  Sun   Pharma  "), "Sun Pharma");
    }
}
