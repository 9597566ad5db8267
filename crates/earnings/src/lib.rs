#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/earnings/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Unified interface for locating earnings-call documents.
//!
//! This crate re-exports the core reconciliation pipeline and source
//! implementations, and provides a [`SourceRegistry`] for composing sources
//! per region, an [`EarningsService`] for fanning queries out and
//! deduplicating the merged results, and a [`Downloader`] for fetching the
//! reconciled files.
//!
//! # Features
//!
//! - `screener` - Screener.in source for Indian companies
//! - `edgar` - SEC EDGAR source for US companies
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use earnings::{DocTypeFilter, EarningsService, Region, SourceRegistry};
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = SourceRegistry::new()
//!         .with_screener()
//!         .with_edgar("MyApp/1.0 (contact@example.com)");
//!     let service = EarningsService::new(Arc::new(registry));
//!
//!     let documents = service
//!         .fetch_documents("Tata Motors", Region::India, 5, &DocTypeFilter::default())
//!         .await;
//!     for document in documents {
//!         println!("{} {} {}", document.quarter, document.year, document.url);
//!     }
//! }
//! ```

// Core types, pipeline stages, and the source trait
pub use earnings_core::*;

// Sources
#[cfg(feature = "edgar")]
pub use earnings_edgar::EdgarSource;
#[cfg(feature = "screener")]
pub use earnings_screener::ScreenerSource;

mod config;
mod downloader;
mod registry;
mod service;

pub use config::Config;
pub use downloader::{DownloadOutcome, DownloadStatus, Downloader};
pub use registry::SourceRegistry;
pub use service::{EarningsService, RegionInfo};
