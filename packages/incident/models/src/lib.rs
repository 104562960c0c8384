#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Raw and cleaned incident record types.
//!
//! A pipeline run starts with a [`RawTable`] (every published column,
//! untouched) and narrows it into [`IncidentRecord`]s that only carry the
//! occurrence date and the region label. [`SourceColumn`] enumerates the
//! published column schema of the built-in shooting incident dataset.

use std::collections::BTreeMap;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Text format of the occurrence date in the published CSV (`06/01/2005`).
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y";

/// The 21 columns published with the NYPD Shooting Incident dataset.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, AsRefStr,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceColumn {
    /// Randomly generated persistent incident ID
    IncidentKey,
    /// Date the shooting occurred (`MM/DD/YYYY`)
    OccurDate,
    /// Time of day the shooting occurred
    OccurTime,
    /// Borough where the shooting occurred
    Boro,
    /// Inside/outside descriptor
    LocOfOccurDesc,
    /// Precinct where the shooting occurred
    Precinct,
    /// Jurisdiction code (patrol, transit, housing)
    JurisdictionCode,
    /// Location classification
    LocClassfctnDesc,
    /// Location of the shooting
    LocationDesc,
    /// Whether the shooting resulted in a murder
    StatisticalMurderFlag,
    /// Perpetrator's age group
    PerpAgeGroup,
    /// Perpetrator's sex
    PerpSex,
    /// Perpetrator's race
    PerpRace,
    /// Victim's age group
    VicAgeGroup,
    /// Victim's sex
    VicSex,
    /// Victim's race
    VicRace,
    /// Midblock X-coordinate (NY State Plane, feet)
    #[strum(to_string = "X_COORD_CD")]
    XCoordCd,
    /// Midblock Y-coordinate (NY State Plane, feet)
    #[strum(to_string = "Y_COORD_CD")]
    YCoordCd,
    /// Latitude (WGS84)
    #[strum(to_string = "Latitude")]
    Latitude,
    /// Longitude (WGS84)
    #[strum(to_string = "Longitude")]
    Longitude,
    /// Combined point (`POINT (lon lat)`)
    #[strum(to_string = "Lon_Lat")]
    LonLat,
}

impl SourceColumn {
    /// Returns every published column in file order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::IncidentKey,
            Self::OccurDate,
            Self::OccurTime,
            Self::Boro,
            Self::LocOfOccurDesc,
            Self::Precinct,
            Self::JurisdictionCode,
            Self::LocClassfctnDesc,
            Self::LocationDesc,
            Self::StatisticalMurderFlag,
            Self::PerpAgeGroup,
            Self::PerpSex,
            Self::PerpRace,
            Self::VicAgeGroup,
            Self::VicSex,
            Self::VicRace,
            Self::XCoordCd,
            Self::YCoordCd,
            Self::Latitude,
            Self::Longitude,
            Self::LonLat,
        ]
    }
}

/// Which raw columns feed the cleaned [`IncidentRecord`] projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Column holding the occurrence date.
    pub date: String,
    /// `chrono` format string the date column is written in.
    #[serde(default = "default_date_format")]
    pub date_format: String,
    /// Column holding the region label.
    pub region: String,
    /// Region labels the dataset documents. Empty means "don't check".
    #[serde(default)]
    pub regions: Vec<String>,
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_owned()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            date: SourceColumn::OccurDate.to_string(),
            date_format: default_date_format(),
            region: SourceColumn::Boro.to_string(),
            regions: ["BRONX", "BROOKLYN", "MANHATTAN", "QUEENS", "STATEN ISLAND"]
                .iter()
                .map(|r| (*r).to_owned())
                .collect(),
        }
    }
}

impl FieldMapping {
    /// Returns `true` if `region` is one of the documented labels, or if no
    /// labels are documented.
    #[must_use]
    pub fn is_known_region(&self, region: &str) -> bool {
        self.regions.is_empty() || self.regions.iter().any(|r| r == region)
    }
}

/// One row of the source table as ingested.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRecord {
    /// 1-based data row number (the header row is not counted).
    pub row: usize,
    /// Header name → trimmed cell text. Empty text means a missing value.
    pub fields: BTreeMap<String, String>,
}

impl RawRecord {
    /// Creates an empty record for the given data row.
    #[must_use]
    pub const fn new(row: usize) -> Self {
        Self {
            row,
            fields: BTreeMap::new(),
        }
    }

    /// Sets a field value.
    #[must_use]
    pub fn with_field(mut self, column: &str, value: &str) -> Self {
        self.fields.insert(column.to_owned(), value.to_owned());
        self
    }

    /// Returns the cell text for `column`, or `None` when the column is
    /// absent or the cell is empty.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&str> {
        self.fields
            .get(column)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// An in-memory table of [`RawRecord`]s in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTable {
    /// Column headers in file order.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub records: Vec<RawRecord>,
}

impl RawTable {
    /// Returns `true` if the header row contains `column`.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// An incident narrowed to the fields the aggregates need.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Calendar date the incident occurred.
    pub occur_date: NaiveDate,
    /// Administrative region label as published (e.g. `"BROOKLYN"`).
    pub region: String,
}

impl IncidentRecord {
    /// Creates a new record.
    #[must_use]
    pub fn new(occur_date: NaiveDate, region: &str) -> Self {
        Self {
            occur_date,
            region: region.to_owned(),
        }
    }

    /// Calendar year of the occurrence date.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.occur_date.year()
    }

    /// Re-projects this record into a [`RawRecord`] carrying only the date
    /// and region columns, with the date written back in `date_format`.
    #[must_use]
    pub fn to_raw(
        &self,
        row: usize,
        date_column: &str,
        region_column: &str,
        date_format: &str,
    ) -> RawRecord {
        RawRecord::new(row)
            .with_field(date_column, &format_source_date(self.occur_date, date_format))
            .with_field(region_column, &self.region)
    }
}

/// Parses a source date string under `format`.
///
/// # Errors
///
/// Returns [`chrono::ParseError`] if `s` does not match `format`.
pub fn parse_source_date(s: &str, format: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), format)
}

/// Formats a date back into the source's textual format.
#[must_use]
pub fn format_source_date(date: NaiveDate, format: &str) -> String {
    date.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use super::*;

    #[test]
    fn source_columns_use_published_names() {
        let names: Vec<String> = SourceColumn::all().iter().map(ToString::to_string).collect();
        assert_eq!(names.len(), 21);
        assert_eq!(names[0], "INCIDENT_KEY");
        assert_eq!(names[1], "OCCUR_DATE");
        assert_eq!(names[3], "BORO");
        assert_eq!(names[7], "LOC_CLASSFCTN_DESC");
        assert_eq!(names[16], "X_COORD_CD");
        assert_eq!(names[20], "Lon_Lat");
    }

    #[test]
    fn source_column_parses_from_header() {
        assert_eq!(
            SourceColumn::from_str("STATISTICAL_MURDER_FLAG").unwrap(),
            SourceColumn::StatisticalMurderFlag
        );
        assert_eq!(
            SourceColumn::from_str("Latitude").unwrap(),
            SourceColumn::Latitude
        );
        assert!(SourceColumn::from_str("NOT_A_COLUMN").is_err());
    }

    #[test]
    fn raw_record_treats_empty_cells_as_missing() {
        let record = RawRecord::new(1)
            .with_field("BORO", "BRONX")
            .with_field("PERP_SEX", "");
        assert_eq!(record.value("BORO"), Some("BRONX"));
        assert_eq!(record.value("PERP_SEX"), None);
        assert_eq!(record.value("ABSENT"), None);
    }

    #[test]
    fn date_round_trips_through_source_format() {
        for s in ["06/01/2005", "12/31/2019", "01/01/2006", "02/29/2020"] {
            let date = parse_source_date(s, DEFAULT_DATE_FORMAT).unwrap();
            assert_eq!(format_source_date(date, DEFAULT_DATE_FORMAT), s);
        }
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_source_date("2005-06-01", DEFAULT_DATE_FORMAT).is_err());
        assert!(parse_source_date("13/01/2005", DEFAULT_DATE_FORMAT).is_err());
        assert!(parse_source_date("", DEFAULT_DATE_FORMAT).is_err());
    }

    #[test]
    fn default_mapping_targets_date_and_borough() {
        let mapping = FieldMapping::default();
        assert_eq!(mapping.date, "OCCUR_DATE");
        assert_eq!(mapping.region, "BORO");
        assert_eq!(mapping.date_format, DEFAULT_DATE_FORMAT);
        assert!(mapping.is_known_region("STATEN ISLAND"));
        assert!(!mapping.is_known_region("NEWARK"));
    }

    #[test]
    fn mapping_without_regions_accepts_any_label() {
        let mapping = FieldMapping {
            regions: Vec::new(),
            ..FieldMapping::default()
        };
        assert!(mapping.is_known_region("NEWARK"));
    }

    #[test]
    fn to_raw_writes_source_date_format() {
        let record = IncidentRecord::new(NaiveDate::from_ymd_opt(2005, 6, 1).unwrap(), "BROOKLYN");
        let raw = record.to_raw(7, "OCCUR_DATE", "BORO", DEFAULT_DATE_FORMAT);
        assert_eq!(raw.row, 7);
        assert_eq!(raw.value("OCCUR_DATE"), Some("06/01/2005"));
        assert_eq!(raw.value("BORO"), Some("BROOKLYN"));
        assert_eq!(record.year(), 2005);
    }
}
