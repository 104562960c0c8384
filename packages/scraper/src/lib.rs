#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Readers that turn a tabular CSV resource into a [`RawTable`].
//!
//! Provides the [`Scraper`] trait and two implementations: remote
//! downloads over HTTP ([`csv_download`]) and local files ([`csv_file`]).
//! Both share the CSV decoding in [`csv_table`], which handles gzip bodies,
//! custom delimiters and an optional record cap.
//!
//! This crate knows nothing about which columns matter. Every cell is kept
//! as trimmed text so that callers decide what to project and validate.

pub mod csv_download;
pub mod csv_file;
pub mod csv_table;

use incident_trends_incident_models::RawTable;

/// Errors that can occur while fetching or decoding a table.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    /// An HTTP request failed (connection error or non-2xx status).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The body could not be interpreted as a table.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    /// Returns `true` when the failure happened while obtaining the bytes
    /// (network or filesystem), as opposed to decoding them.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Io(_))
    }
}

/// Trait for reading a complete table from some location.
///
/// Each call performs exactly one attempt. Implementations release any
/// connection or file handle before returning.
pub trait Scraper: Send + Sync {
    /// Fetches and decodes the whole table.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if reading or decoding fails.
    fn fetch_table(&self) -> impl std::future::Future<Output = Result<RawTable, ScrapeError>> + Send;

    /// Returns the name of the reading strategy (e.g. `"csv_download"`).
    fn strategy(&self) -> &str;
}
