//! Core data types for earnings documents.
//!
//! This module defines the fundamental data structures:
//!
//! - [`Document`] - A single earnings-call document located at a source
//! - [`DocType`] - Document kind (transcript, presentation, press release)
//! - [`Region`] - Closed set of supported listing regions
//! - [`FiscalYearType`] - Fiscal-year labelling convention of a region
//! - [`DocTypeFilter`] - Which document kinds a caller wants
//! - [`CompanyMatch`] - A company search result from a source

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EarningsError;

/// Kind of earnings document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    /// Earnings-call transcript.
    Transcript,
    /// Investor presentation.
    Presentation,
    /// Press release or current report.
    PressRelease,
}

impl DocType {
    /// Returns the snake_case name used in filenames and API payloads.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Transcript => "transcript",
            Self::Presentation => "presentation",
            Self::PressRelease => "press_release",
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = EarningsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transcript" => Ok(Self::Transcript),
            "presentation" => Ok(Self::Presentation),
            "press_release" | "press-release" => Ok(Self::PressRelease),
            other => Err(EarningsError::InvalidParameter(format!(
                "Unknown document type: {other}"
            ))),
        }
    }
}

/// Listing region of a company.
///
/// The set is closed; an unrecognized region string is a user-input error,
/// not a pipeline fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    /// Indian exchanges (BSE/NSE), April-March fiscal year.
    India,
    /// United States, calendar-year reporting.
    Us,
    /// Japan (TDnet).
    Japan,
    /// Korea (DART).
    Korea,
    /// China (CNINFO).
    China,
}

impl Region {
    /// Returns the lowercase identifier used in APIs and config.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::India => "india",
            Self::Us => "us",
            Self::Japan => "japan",
            Self::Korea => "korea",
            Self::China => "china",
        }
    }

    /// All supported regions.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [Self::India, Self::Us, Self::Japan, Self::Korea, Self::China]
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Region {
    type Err = EarningsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "india" => Ok(Self::India),
            "us" => Ok(Self::Us),
            "japan" => Ok(Self::Japan),
            "korea" => Ok(Self::Korea),
            "china" => Ok(Self::China),
            other => Err(EarningsError::InvalidRegion(other.to_string())),
        }
    }
}

/// Fiscal-year labelling convention used by a region's sources.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FiscalYearType {
    /// April-March fiscal year named after its ending calendar year
    /// (e.g. `FY26` ends March 2026). Used by Indian sources.
    #[default]
    IndianFiscal,
    /// Calendar-year quarters with 4-digit year labels. Used by US sources.
    Calendar,
}

/// Which document kinds a caller wants fetched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocTypeFilter {
    /// Include earnings-call transcripts.
    pub transcripts: bool,
    /// Include investor presentations.
    pub presentations: bool,
    /// Include press releases.
    pub press_releases: bool,
}

impl Default for DocTypeFilter {
    fn default() -> Self {
        Self {
            transcripts: true,
            presentations: true,
            press_releases: true,
        }
    }
}

impl DocTypeFilter {
    /// Filter that includes only transcripts.
    #[must_use]
    pub const fn transcripts_only() -> Self {
        Self {
            transcripts: true,
            presentations: false,
            press_releases: false,
        }
    }

    /// Returns true if the given document kind passes this filter.
    #[must_use]
    pub const fn includes(&self, doc_type: DocType) -> bool {
        match doc_type {
            DocType::Transcript => self.transcripts,
            DocType::Presentation => self.presentations,
            DocType::PressRelease => self.press_releases,
        }
    }
}

/// An earnings-call document located at a source.
///
/// A `Document` is a value type: it is fully determined by its fields at
/// construction, compares by structural equality over all fields, and is
/// never mutated afterwards. This makes it safe to use (or reduce to a key
/// tuple) in map-based deduplication.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// Company display name as reported by the originating source.
    pub company: String,
    /// Quarter label: `"Q1"`..`"Q4"`, `"FY"` (annual), or `"Unknown"`.
    pub quarter: String,
    /// Year label: `"FY{nn}"` or a 4-digit calendar year, per region.
    pub year: String,
    /// Kind of document.
    pub doc_type: DocType,
    /// Absolute download URL. The canonical locator and primary dedup key.
    pub url: String,
    /// Identifier of the source that produced this record.
    pub source: String,
    /// Document date, when the source reports one.
    pub date: Option<DateTime<Utc>>,
}

impl Document {
    /// Creates a new document record with no date.
    #[must_use]
    pub fn new(
        company: impl Into<String>,
        quarter: impl Into<String>,
        year: impl Into<String>,
        doc_type: DocType,
        url: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            company: company.into(),
            quarter: quarter.into(),
            year: year.into(),
            doc_type,
            url: url.into(),
            source: source.into(),
            date: None,
        }
    }

    /// Sets the document date.
    #[must_use]
    pub const fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Derives a filesystem-safe filename for this document.
    ///
    /// The company name is stripped of non-word characters and truncated,
    /// and the extension is sniffed from the URL.
    #[must_use]
    pub fn filename(&self) -> String {
        let safe_company: String = self
            .company
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
            .collect();
        let safe_company: String = safe_company
            .trim()
            .replace(' ', "_")
            .chars()
            .take(50)
            .collect();
        format!(
            "{safe_company}_{}{}_{}{}",
            self.quarter,
            self.year,
            self.doc_type,
            self.extension()
        )
    }

    /// Determines the file extension from the URL or document kind.
    fn extension(&self) -> &'static str {
        let url = self.url.to_lowercase();
        if url.contains(".pdf") {
            ".pdf"
        } else if url.contains(".ppt") || url.contains(".pptx") {
            ".pptx"
        } else if url.contains(".mp3") || url.contains(".wav") {
            ".mp3"
        } else {
            ".pdf"
        }
    }
}

/// A company search result from a source adapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMatch {
    /// Company display name.
    pub name: String,
    /// Ticker symbol, when the source knows one.
    pub symbol: Option<String>,
    /// Exchange identifier (ISIN, CIK, etc.), when available.
    pub identifier: Option<String>,
    /// URL of the company's page at the source.
    pub url: String,
    /// Identifier of the source that produced this match.
    pub source: String,
    /// Region the source covers.
    pub region: Region,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_round_trip() {
        for region in Region::all() {
            assert_eq!(region.as_str().parse::<Region>().unwrap(), region);
        }
    }

    #[test]
    fn test_invalid_region_is_user_error() {
        let err = "europe".parse::<Region>().unwrap_err();
        assert!(matches!(err, EarningsError::InvalidRegion(_)));
    }

    #[test]
    fn test_filename_sanitizes_company() {
        let doc = Document::new(
            "Tata Motors Ltd.",
            "Q3",
            "FY26",
            DocType::Transcript,
            "https://www.bseindia.com/xml-data/transcript.pdf",
            "bse",
        );
        assert_eq!(doc.filename(), "Tata_Motors_Ltd_Q3FY26_transcript.pdf");
    }

    #[test]
    fn test_filename_extension_from_url() {
        let doc = Document::new(
            "Lupin",
            "Q1",
            "FY25",
            DocType::Presentation,
            "https://example.com/deck.PPTX?dl=1",
            "company_ir",
        );
        assert!(doc.filename().ends_with("_presentation.pptx"));
    }

    #[test]
    fn test_doc_type_filter_includes() {
        let filter = DocTypeFilter::transcripts_only();
        assert!(filter.includes(DocType::Transcript));
        assert!(!filter.includes(DocType::Presentation));
        assert!(!filter.includes(DocType::PressRelease));
    }
}
