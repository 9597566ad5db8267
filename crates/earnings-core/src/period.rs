//! Fiscal-period parsing from free text.
//!
//! Sources label documents inconsistently: "Q3FY26", "Q3 2025", "Jan 2026",
//! "Concall - Oct 2025". This module extracts a `(quarter, year)` pair from
//! such text, applying the fiscal-year convention of the originating region.
//!
//! Indian sources use an April-March fiscal year named after its ending
//! calendar year ("FY26" ends March 2026); US sources use calendar quarters.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::FiscalYearType;

static QUARTER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)Q([1-4])\s*(?:FY)?(\d{2,4})").expect("quarter pattern is valid")
});

static MONTH_YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+(\d{4})\b")
        .expect("month-year pattern is valid")
});

/// Extracts a `(quarter, year)` pair from free text.
///
/// Tried in order of precedence:
///
/// 1. Explicit `Q{n}` notation, optionally with `FY` and a 2-4 digit year.
///    A 2-digit year is labelled `FY{nn}`; longer year tokens are kept
///    verbatim.
/// 2. Month name + 4-digit calendar year, mapped through the fiscal-year
///    rules of `fiscal_year`.
///
/// Returns `None` when neither pattern matches; callers substitute
/// `"Unknown"` / empty rather than treating this as an error.
#[must_use]
pub fn parse_period(text: &str, fiscal_year: FiscalYearType) -> Option<(String, String)> {
    if let Some(caps) = QUARTER_RE.captures(text) {
        let quarter = format!("Q{}", &caps[1]);
        let year_token = &caps[2];
        let year = if year_token.len() == 2 {
            format!("FY{year_token}")
        } else {
            year_token.to_string()
        };
        return Some((quarter, year));
    }

    let caps = MONTH_YEAR_RE.captures(text)?;
    let month = month_number(&caps[1].to_lowercase())?;
    let year: i32 = caps[2].parse().ok()?;

    match fiscal_year {
        FiscalYearType::IndianFiscal => Some(indian_fiscal_quarter(month, year)),
        FiscalYearType::Calendar => Some(calendar_quarter(month, year)),
    }
}

fn month_number(prefix: &str) -> Option<u32> {
    let months = [
        "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    ];
    months
        .iter()
        .position(|m| *m == prefix)
        .map(|i| i as u32 + 1)
}

/// Maps a calendar month to the Indian fiscal quarter it reports on.
///
/// A document dated shortly after a quarter ends discusses that quarter:
/// Jan/Feb -> Q3 of the fiscal year ending that March, Mar/Apr -> Q4 of the
/// same fiscal year, May-Jul -> Q1 of the next, Aug-Oct -> Q2, Nov/Dec -> Q3.
fn indian_fiscal_quarter(month: u32, year: i32) -> (String, String) {
    let (quarter, fy_end_year) = match month {
        1 | 2 => ("Q3", year),
        3 | 4 => ("Q4", year),
        5..=7 => ("Q1", year + 1),
        8..=10 => ("Q2", year + 1),
        _ => ("Q3", year + 1),
    };
    (
        quarter.to_string(),
        format!("FY{:02}", fy_end_year.rem_euclid(100)),
    )
}

/// Maps a calendar month to its calendar quarter, year label as-is.
fn calendar_quarter(month: u32, year: i32) -> (String, String) {
    let quarter = match month {
        1..=3 => "Q1",
        4..=6 => "Q2",
        7..=9 => "Q3",
        _ => "Q4",
    };
    (quarter.to_string(), year.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_indian(text: &str) -> Option<(String, String)> {
        parse_period(text, FiscalYearType::IndianFiscal)
    }

    #[test]
    fn test_explicit_quarter_fy() {
        assert_eq!(
            parse_indian("Q3FY26"),
            Some(("Q3".to_string(), "FY26".to_string()))
        );
        assert_eq!(
            parse_indian("Earnings Call Q1 FY25 Transcript"),
            Some(("Q1".to_string(), "FY25".to_string()))
        );
    }

    #[test]
    fn test_explicit_quarter_four_digit_year() {
        assert_eq!(
            parse_indian("Q3 2025"),
            Some(("Q3".to_string(), "2025".to_string()))
        );
    }

    #[test]
    fn test_month_year_indian_fiscal() {
        // January reports Q3 of the fiscal year ending that March.
        assert_eq!(
            parse_indian("Jan 2026"),
            Some(("Q3".to_string(), "FY26".to_string()))
        );
        assert_eq!(
            parse_indian("Transcript - April 2025"),
            Some(("Q4".to_string(), "FY25".to_string()))
        );
        // May onwards belongs to the next fiscal year.
        assert_eq!(
            parse_indian("May 2025"),
            Some(("Q1".to_string(), "FY26".to_string()))
        );
        assert_eq!(
            parse_indian("Oct 2025"),
            Some(("Q2".to_string(), "FY26".to_string()))
        );
        assert_eq!(
            parse_indian("December 2025"),
            Some(("Q3".to_string(), "FY26".to_string()))
        );
    }

    #[test]
    fn test_month_year_calendar() {
        assert_eq!(
            parse_period("Feb 2025", FiscalYearType::Calendar),
            Some(("Q1".to_string(), "2025".to_string()))
        );
        assert_eq!(
            parse_period("November 2025", FiscalYearType::Calendar),
            Some(("Q4".to_string(), "2025".to_string()))
        );
    }

    #[test]
    fn test_quarter_notation_takes_precedence() {
        // Both patterns present; Q notation wins.
        assert_eq!(
            parse_indian("Q2FY25 call held Nov 2024"),
            Some(("Q2".to_string(), "FY25".to_string()))
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(parse_indian("no date here"), None);
        assert_eq!(parse_indian(""), None);
    }
}
