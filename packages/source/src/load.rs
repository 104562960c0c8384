//! Loader: fetches a dataset into a [`RawTable`].
//!
//! Picks the [`Scraper`] matching the [`SourceLocation`], applies the
//! dataset's encoding, and verifies the header row before handing the
//! table to the cleaner. One attempt, no retry.

use std::sync::Arc;

use incident_trends_incident_models::RawTable;
use incident_trends_scraper::Scraper;
use incident_trends_scraper::csv_download::CsvDownloadScraper;
use incident_trends_scraper::csv_file::CsvFileScraper;

use crate::dataset_def::{DatasetDefinition, FormatConfig};
use crate::progress::ProgressCallback;
use crate::{FetchOptions, LoadError, SourceLocation};

/// Reads the table at `location` with the given encoding.
///
/// # Errors
///
/// Returns [`LoadError::Fetch`] if the resource cannot be read and
/// [`LoadError::Parse`] if it is not a well-formed CSV.
pub async fn load_table(
    location: &SourceLocation,
    format: &FormatConfig,
    options: &FetchOptions,
) -> Result<RawTable, LoadError> {
    let result = match location {
        SourceLocation::Url(url) => {
            let mut scraper = CsvDownloadScraper::new(url)
                .with_delimiter(format.delimiter_byte())
                .with_gzip(format.is_gzipped());
            if let Some(limit) = options.limit {
                scraper = scraper.with_max_records(limit);
            }
            log::debug!("Loading {location} via {}", scraper.strategy());
            scraper.fetch_table().await
        }
        SourceLocation::Path(path) => {
            let mut scraper = CsvFileScraper::new(path).with_delimiter(format.delimiter_byte());
            if format.is_gzipped() {
                scraper = scraper.with_gzip(true);
            }
            if let Some(limit) = options.limit {
                scraper = scraper.with_max_records(limit);
            }
            log::debug!("Loading {location} via {}", scraper.strategy());
            scraper.fetch_table().await
        }
    };

    result.map_err(|e| LoadError::from_scrape(location, e))
}

/// Loads a dataset and checks its header row.
///
/// `location` overrides the definition's URL (e.g. a local copy of the
/// export). The date and region columns must be present; other documented
/// columns that are absent only produce a warning.
///
/// # Errors
///
/// Returns [`LoadError`] if the table cannot be read, is malformed, or
/// lacks the date or region column.
pub async fn load_dataset(
    def: &DatasetDefinition,
    location: Option<&SourceLocation>,
    options: &FetchOptions,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<RawTable, LoadError> {
    let location = location.cloned().unwrap_or_else(|| def.location());

    log::info!("[{}] Loading {location}", def.id);
    progress.set_message(format!("[{}] loading {location}", def.id));

    let table = load_table(&location, &def.format, options)
        .await
        .inspect_err(|_| progress.finish_and_clear())?;

    for required in [&def.fields.date, &def.fields.region] {
        if !table.has_column(required) {
            progress.finish_and_clear();
            return Err(LoadError::MissingColumn {
                location: location.to_string(),
                column: required.clone(),
            });
        }
    }

    let absent: Vec<&str> = def
        .optional_columns()
        .filter(|c| !table.has_column(c))
        .collect();
    if !absent.is_empty() {
        log::warn!(
            "[{}] {} documented column(s) absent: {}",
            def.id,
            absent.len(),
            absent.join(", ")
        );
    }

    let count = table.len() as u64;
    progress.inc(count);
    progress.finish(format!("[{}] loaded {count} records", def.id));
    log::info!("[{}] Loaded {count} records", def.id);

    Ok(table)
}
