#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Dataset definitions and the table loader.
//!
//! A [`dataset_def::DatasetDefinition`] describes a published incident CSV.
//! [`load::load_dataset`] fetches it (from its URL or from an override
//! location) into a [`incident_trends_incident_models::RawTable`] and checks
//! that the columns the cleaner needs are present.

pub mod dataset_def;
pub mod load;
pub mod progress;
pub mod registry;

use std::path::PathBuf;

use incident_trends_scraper::ScrapeError;

/// Errors that can occur while loading a table.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The bytes could not be obtained (network or filesystem failure).
    #[error("Fetch failed for {location}: {source}")]
    Fetch {
        /// Where the table was being read from.
        location: String,
        /// Underlying failure.
        #[source]
        source: ScrapeError,
    },

    /// The bytes were obtained but are not a well-formed table.
    #[error("Parse failed for {location}: {source}")]
    Parse {
        /// Where the table was being read from.
        location: String,
        /// Underlying failure.
        #[source]
        source: ScrapeError,
    },

    /// The header row lacks a column the cleaner needs.
    #[error("Required column '{column}' missing from {location}")]
    MissingColumn {
        /// Where the table was read from.
        location: String,
        /// The absent column.
        column: String,
    },
}

impl LoadError {
    /// Classifies a [`ScrapeError`] as a fetch or parse failure.
    #[must_use]
    pub fn from_scrape(location: &SourceLocation, source: ScrapeError) -> Self {
        let location = location.to_string();
        if source.is_fetch() {
            Self::Fetch { location, source }
        } else {
            Self::Parse { location, source }
        }
    }

    /// Returns `true` for failures to obtain the bytes.
    #[must_use]
    pub const fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// Where a table is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// Remote resource fetched over HTTP(S).
    Url(String),
    /// Local file.
    Path(PathBuf),
}

impl SourceLocation {
    /// Interprets `s` as a URL when it has an `http://` or `https://`
    /// scheme, and as a filesystem path otherwise.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::Path(PathBuf::from(trimmed))
        }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Options for a single load.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Maximum number of records to parse.
    pub limit: Option<u64>,
}
