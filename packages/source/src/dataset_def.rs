//! Config-driven dataset definition.
//!
//! [`DatasetDefinition`] captures everything the pipeline needs to know
//! about a published incident dataset: where to download it, how the file
//! is encoded, which columns it documents and which of them feed the
//! cleaned projection.

use incident_trends_incident_models::FieldMapping;
use serde::Deserialize;

use crate::SourceLocation;

/// A complete, config-driven dataset definition.
///
/// Loaded from TOML files embedded at compile time (see
/// [`crate::registry`]).
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetDefinition {
    /// Unique identifier (e.g., `"nypd_shootings"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// One-line description of what a row represents.
    #[serde(default)]
    pub description: Option<String>,
    /// Download URL for the CSV export.
    pub url: String,
    /// Human-readable portal page for the dataset.
    #[serde(default)]
    pub portal_url: Option<String>,
    /// Columns the publisher documents, in file order.
    #[serde(default)]
    pub columns: Vec<String>,
    /// Licensing and usage metadata.
    pub license: LicenseInfo,
    /// How the file is encoded.
    #[serde(default)]
    pub format: FormatConfig,
    /// Which columns feed the cleaned projection.
    pub fields: FieldMapping,
}

// ── License metadata ─────────────────────────────────────────────────────

/// Licensing and usage restrictions for a dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct LicenseInfo {
    /// License type identifier (e.g. `"open_data"`, `"public_domain"`).
    pub license_type: String,
    /// URL to the terms of use, if available.
    pub tos_url: Option<String>,
    /// Whether attribution is required when using this data.
    pub attribution_required: bool,
    /// Whether redistribution of the data is allowed.
    #[serde(default)]
    pub allows_redistribution: bool,
    /// Free-form notes.
    pub notes: Option<String>,
}

// ── File format ──────────────────────────────────────────────────────────

/// Encoding of the downloaded file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormatConfig {
    /// Field delimiter (default: comma).
    pub delimiter: Option<String>,
    /// Compression format (`"gzip"` or `None`).
    pub compressed: Option<String>,
}

impl FormatConfig {
    /// The delimiter byte, falling back to `,`.
    #[must_use]
    pub fn delimiter_byte(&self) -> u8 {
        self.delimiter
            .as_deref()
            .and_then(|d| d.as_bytes().first().copied())
            .unwrap_or(b',')
    }

    /// Whether the body is gzip-compressed.
    #[must_use]
    pub fn is_gzipped(&self) -> bool {
        self.compressed.as_deref() == Some("gzip")
    }
}

impl DatasetDefinition {
    /// The default download location for this dataset.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        SourceLocation::parse(&self.url)
    }

    /// Documented columns the pipeline does not project but still expects
    /// to see in the header row.
    pub fn optional_columns(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .map(String::as_str)
            .filter(|c| *c != self.fields.date && *c != self.fields.region)
    }
}

/// Parses a [`DatasetDefinition`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetDefinition, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}
