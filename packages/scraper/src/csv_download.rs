//! CSV file downloader.
//!
//! Downloads a CSV (optionally gzip-compressed) from a URL in a single
//! request and decodes it with [`crate::csv_table::parse_csv`].

use incident_trends_incident_models::RawTable;

use crate::csv_table::{CsvOptions, parse_csv};
use crate::{ScrapeError, Scraper};

/// Scraper that downloads and parses a CSV file over HTTP.
#[derive(Debug, Clone)]
pub struct CsvDownloadScraper {
    /// URL of the CSV file to download.
    url: String,
    /// Decoding options.
    options: CsvOptions,
}

impl CsvDownloadScraper {
    /// Creates a new `CsvDownloadScraper` for the given URL with default
    /// settings (comma-delimited, not gzipped, no record limit).
    #[must_use]
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_owned(),
            options: CsvOptions::default(),
        }
    }

    /// Marks the download as gzip-compressed so that the response body will be
    /// decompressed before CSV parsing.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.options.is_gzipped = gzipped;
        self
    }

    /// Sets the field delimiter (e.g. `b'\t'` for TSV files).
    #[must_use]
    pub const fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.options.delimiter = delimiter;
        self
    }

    /// Limits the number of records that will be parsed from the file.
    #[must_use]
    pub const fn with_max_records(mut self, max: u64) -> Self {
        self.options.max_records = Some(max);
        self
    }

    /// The URL this scraper downloads.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Scraper for CsvDownloadScraper {
    async fn fetch_table(&self) -> Result<RawTable, ScrapeError> {
        let client = reqwest::Client::builder().build()?;
        let response = client.get(&self.url).send().await?.error_for_status()?;
        let bytes = response.bytes().await?;

        log::debug!("Downloaded {} bytes from {}", bytes.len(), self.url);

        let table = parse_csv(&bytes, &self.options)?;

        log::info!("Parsed {} records from CSV at {}", table.len(), self.url);

        Ok(table)
    }

    fn strategy(&self) -> &'static str {
        "csv_download"
    }
}
