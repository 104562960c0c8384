//! CSV decoding shared by every reader.
//!
//! Decompresses gzip bodies when asked, parses the first row as headers and
//! keeps every subsequent row as a [`RawRecord`] keyed by those headers.

use std::io::Read as _;

use incident_trends_incident_models::{RawRecord, RawTable};

use crate::ScrapeError;

/// Decoding options for a CSV body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// Whether the body is gzip-compressed.
    pub is_gzipped: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
    /// Optional cap on the number of records to parse.
    pub max_records: Option<u64>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            is_gzipped: false,
            delimiter: b',',
            max_records: None,
        }
    }
}

/// Decodes a CSV body into a [`RawTable`].
///
/// Rows shorter than the header row are padded with empty (missing)
/// cells. Cell text and headers are trimmed.
///
/// # Errors
///
/// Returns [`ScrapeError::Parse`] if the body has no header row or is not
/// valid gzip when `is_gzipped` is set, and [`ScrapeError::Csv`] for
/// malformed CSV.
pub fn parse_csv(bytes: &[u8], options: &CsvOptions) -> Result<RawTable, ScrapeError> {
    // ── Decompress if needed ────────────────────────────────────────
    let decompressed;
    let csv_bytes: &[u8] = if options.is_gzipped {
        let mut decoder = flate2::read::GzDecoder::new(bytes);
        let mut buf = Vec::new();
        decoder
            .read_to_end(&mut buf)
            .map_err(|e| ScrapeError::Parse(format!("gzip decompression failed: {e}")))?;
        log::debug!("Decompressed {} bytes to {}", bytes.len(), buf.len());
        decompressed = buf;
        &decompressed
    } else {
        bytes
    };

    // ── Parse CSV ───────────────────────────────────────────────────
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .flexible(true)
        .from_reader(csv_bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(ScrapeError::Parse(
            "CSV file contains no header row".to_owned(),
        ));
    }

    let mut records: Vec<RawRecord> = Vec::new();

    for (i, result) in reader.records().enumerate() {
        if let Some(max) = options.max_records
            && records.len() as u64 >= max
        {
            log::info!("Reached max_records limit ({max}), stopping CSV parse");
            break;
        }

        let record = result?;

        let mut raw = RawRecord::new(i + 1);
        for (col, header) in headers.iter().enumerate() {
            let value = record.get(col).unwrap_or("").trim();
            raw.fields.insert(header.clone(), value.to_owned());
        }
        records.push(raw);
    }

    Ok(RawTable { headers, records })
}
