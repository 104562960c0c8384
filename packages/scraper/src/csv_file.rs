//! Local CSV file reader.

use std::path::{Path, PathBuf};

use incident_trends_incident_models::RawTable;

use crate::csv_table::{CsvOptions, parse_csv};
use crate::{ScrapeError, Scraper};

/// Scraper that reads a CSV file from the local filesystem.
///
/// A `.gz` extension turns on gzip decoding unless overridden with
/// [`CsvFileScraper::with_gzip`].
#[derive(Debug, Clone)]
pub struct CsvFileScraper {
    path: PathBuf,
    options: CsvOptions,
}

impl CsvFileScraper {
    /// Creates a reader for `path`.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let is_gzipped = path.extension().is_some_and(|ext| ext == "gz");
        Self {
            path,
            options: CsvOptions {
                is_gzipped,
                ..CsvOptions::default()
            },
        }
    }

    /// Overrides gzip detection.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.options.is_gzipped = gzipped;
        self
    }

    /// Sets the field delimiter.
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

    /// The file this scraper reads.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Scraper for CsvFileScraper {
    async fn fetch_table(&self) -> Result<RawTable, ScrapeError> {
        let bytes = tokio::fs::read(&self.path).await?;
        log::debug!("Read {} bytes from {}", bytes.len(), self.path.display());

        let table = parse_csv(&bytes, &self.options)?;
        log::info!(
            "Parsed {} records from CSV at {}",
            table.len(),
            self.path.display()
        );

        Ok(table)
    }

    fn strategy(&self) -> &'static str {
        "csv_file"
    }
}
