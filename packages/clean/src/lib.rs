#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Cleaner: narrows a [`RawTable`] into [`IncidentRecord`]s.
//!
//! [`clean`] parses each record's date under the dataset's fixed format,
//! keeps only the date and region columns, and returns a
//! [`ValidationReport`] alongside the records. The report is advisory:
//! missing values and unrecognised region labels are counted and logged
//! but never change the output.

use std::collections::BTreeMap;

use incident_trends_incident_models::{
    FieldMapping, IncidentRecord, RawRecord, RawTable, parse_source_date,
};
use serde::{Deserialize, Serialize};

/// Errors that abort a cleaning run.
#[derive(Debug, thiserror::Error)]
pub enum CleanError {
    /// A record's date does not match the dataset's date format.
    #[error("Row {row}: date '{value}' does not match format '{format}': {source}")]
    DateParse {
        /// 1-based data row number of the offending record.
        row: usize,
        /// The raw date text (empty when the cell is missing).
        value: String,
        /// The expected `chrono` format string.
        format: String,
        /// Underlying parse failure.
        #[source]
        source: chrono::ParseError,
    },
}

/// What to do with a record whose date does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatePolicy {
    /// Fail the whole run on the first bad date.
    #[default]
    Strict,
    /// Drop the record, log a warning, and list its row in the report.
    SkipAndLog,
}

/// Diagnostics produced alongside the cleaned records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    /// Rows in the raw table.
    pub total_rows: usize,
    /// Rows that made it into the cleaned table.
    pub retained_rows: usize,
    /// Retained column → number of empty or absent cells.
    pub missing: BTreeMap<String, u64>,
    /// Rows dropped under [`DatePolicy::SkipAndLog`].
    pub skipped_rows: Vec<usize>,
    /// Region labels outside the dataset's documented set → occurrences.
    pub unknown_regions: BTreeMap<String, u64>,
}

impl ValidationReport {
    /// Total missing cells across the retained columns.
    #[must_use]
    pub fn missing_total(&self) -> u64 {
        self.missing.values().sum()
    }

    /// Returns `true` when nothing was missing, skipped or unrecognised.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing_total() == 0 && self.skipped_rows.is_empty() && self.unknown_regions.is_empty()
    }
}

/// Output of [`clean`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanedTable {
    /// Projected records in source order.
    pub records: Vec<IncidentRecord>,
    /// Advisory diagnostics.
    pub report: ValidationReport,
}

/// Counts empty or absent cells per column.
///
/// Every requested column appears in the result, with `0` when nothing is
/// missing.
#[must_use]
pub fn missing_values(records: &[RawRecord], columns: &[&str]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> =
        columns.iter().map(|c| ((*c).to_owned(), 0)).collect();

    for record in records {
        for column in columns {
            if record.value(column).is_none()
                && let Some(count) = counts.get_mut(*column)
            {
                *count += 1;
            }
        }
    }

    counts
}

/// Projects a single raw record onto date and region.
///
/// # Errors
///
/// Returns [`CleanError::DateParse`] if the date cell is missing or does
/// not match `mapping.date_format`.
pub fn project(record: &RawRecord, mapping: &FieldMapping) -> Result<IncidentRecord, CleanError> {
    let value = record.value(&mapping.date).unwrap_or_default();
    let occur_date =
        parse_source_date(value, &mapping.date_format).map_err(|source| CleanError::DateParse {
            row: record.row,
            value: value.to_owned(),
            format: mapping.date_format.clone(),
            source,
        })?;

    let region = record.value(&mapping.region).unwrap_or_default();

    Ok(IncidentRecord::new(occur_date, region))
}

/// Cleans a raw table.
///
/// Never mutates `table`. Under [`DatePolicy::Strict`] the first bad date
/// aborts the run; no partial table is returned.
///
/// # Errors
///
/// Returns [`CleanError::DateParse`] under [`DatePolicy::Strict`] when any
/// record's date does not parse.
pub fn clean(
    table: &RawTable,
    mapping: &FieldMapping,
    policy: DatePolicy,
) -> Result<CleanedTable, CleanError> {
    let missing = missing_values(
        &table.records,
        &[mapping.date.as_str(), mapping.region.as_str()],
    );
    for (column, count) in &missing {
        if *count > 0 {
            log::warn!("{count} missing value(s) in column {column}");
        }
    }

    let mut records = Vec::with_capacity(table.len());
    let mut skipped_rows = Vec::new();
    let mut unknown_regions: BTreeMap<String, u64> = BTreeMap::new();

    for raw in &table.records {
        let record = match project(raw, mapping) {
            Ok(record) => record,
            Err(e) => match policy {
                DatePolicy::Strict => return Err(e),
                DatePolicy::SkipAndLog => {
                    log::warn!("Skipping record: {e}");
                    skipped_rows.push(raw.row);
                    continue;
                }
            },
        };

        if !record.region.is_empty() && !mapping.is_known_region(&record.region) {
            *unknown_regions.entry(record.region.clone()).or_default() += 1;
        }

        records.push(record);
    }

    if !unknown_regions.is_empty() {
        log::warn!(
            "Unrecognised region label(s): {}",
            unknown_regions
                .keys()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let report = ValidationReport {
        total_rows: table.len(),
        retained_rows: records.len(),
        missing,
        skipped_rows,
        unknown_regions,
    };

    log::info!(
        "Cleaned {} of {} records ({} missing cells, {} skipped)",
        report.retained_rows,
        report.total_rows,
        report.missing_total(),
        report.skipped_rows.len()
    );

    Ok(CleanedTable { records, report })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn raw(row: usize, date: &str, region: &str) -> RawRecord {
        RawRecord::new(row)
            .with_field("INCIDENT_KEY", &row.to_string())
            .with_field("OCCUR_DATE", date)
            .with_field("BORO", region)
            .with_field("PERP_SEX", "")
    }

    fn table(records: Vec<RawRecord>) -> RawTable {
        RawTable {
            headers: vec![
                "INCIDENT_KEY".to_owned(),
                "OCCUR_DATE".to_owned(),
                "BORO".to_owned(),
                "PERP_SEX".to_owned(),
            ],
            records,
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn projects_date_and_region() {
        let input = table(vec![
            raw(1, "06/01/2005", "BROOKLYN"),
            raw(2, "07/01/2005", "BRONX"),
            raw(3, "01/01/2006", "BROOKLYN"),
        ]);

        let cleaned = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap();

        assert_eq!(
            cleaned.records,
            vec![
                IncidentRecord::new(ymd(2005, 6, 1), "BROOKLYN"),
                IncidentRecord::new(ymd(2005, 7, 1), "BRONX"),
                IncidentRecord::new(ymd(2006, 1, 1), "BROOKLYN"),
            ]
        );
        assert_eq!(cleaned.report.total_rows, 3);
        assert_eq!(cleaned.report.retained_rows, 3);
        assert!(cleaned.report.is_clean());
    }

    #[test]
    fn strict_policy_fails_on_bad_date() {
        let input = table(vec![
            raw(1, "06/01/2005", "BROOKLYN"),
            raw(2, "2005-07-01", "BRONX"),
            raw(3, "01/01/2006", "BROOKLYN"),
        ]);

        let err = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap_err();
        let CleanError::DateParse { row, value, .. } = err;
        assert_eq!(row, 2);
        assert_eq!(value, "2005-07-01");
    }

    #[test]
    fn strict_policy_fails_on_missing_date() {
        let input = table(vec![raw(1, "", "QUEENS")]);
        let err = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap_err();
        assert!(err.to_string().starts_with("Row 1: date ''"));
    }

    #[test]
    fn skip_policy_drops_and_reports_bad_rows() {
        let input = table(vec![
            raw(1, "06/01/2005", "BROOKLYN"),
            raw(2, "not a date", "BRONX"),
            raw(3, "", "QUEENS"),
        ]);

        let cleaned = clean(&input, &FieldMapping::default(), DatePolicy::SkipAndLog).unwrap();

        assert_eq!(cleaned.records.len(), 1);
        assert_eq!(cleaned.report.skipped_rows, vec![2, 3]);
        assert_eq!(cleaned.report.retained_rows, 1);
        assert_eq!(cleaned.report.missing.get("OCCUR_DATE"), Some(&1));
    }

    #[test]
    fn missing_value_report_is_advisory() {
        let input = table(vec![
            raw(1, "06/01/2005", ""),
            raw(2, "07/01/2005", "BRONX"),
        ]);

        let cleaned = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap();

        assert_eq!(cleaned.records.len(), 2);
        assert_eq!(cleaned.records[0].region, "");
        assert_eq!(cleaned.report.missing.get("BORO"), Some(&1));
        assert_eq!(cleaned.report.missing.get("OCCUR_DATE"), Some(&0));
        assert_eq!(cleaned.report.missing_total(), 1);
        assert!(!cleaned.report.missing.contains_key("PERP_SEX"));
    }

    #[test]
    fn counts_missing_values_for_absent_columns() {
        let records = vec![RawRecord::new(1).with_field("BORO", "BRONX")];
        let counts = missing_values(&records, &["BORO", "OCCUR_DATE"]);
        assert_eq!(counts.get("BORO"), Some(&0));
        assert_eq!(counts.get("OCCUR_DATE"), Some(&1));
    }

    #[test]
    fn flags_unknown_regions_without_dropping_them() {
        let input = table(vec![
            raw(1, "06/01/2005", "BROOKLYN"),
            raw(2, "07/01/2005", "NEWARK"),
            raw(3, "08/01/2005", "NEWARK"),
        ]);

        let cleaned = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap();

        assert_eq!(cleaned.records.len(), 3);
        assert_eq!(cleaned.report.unknown_regions.get("NEWARK"), Some(&2));
        assert!(!cleaned.report.is_clean());
    }

    #[test]
    fn empty_table_is_not_an_error() {
        let cleaned = clean(&table(Vec::new()), &FieldMapping::default(), DatePolicy::Strict).unwrap();
        assert!(cleaned.records.is_empty());
        assert_eq!(cleaned.report.total_rows, 0);
        assert_eq!(cleaned.report.missing_total(), 0);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let mapping = FieldMapping::default();
        let input = table(vec![
            raw(1, "06/01/2005", "BROOKLYN"),
            raw(2, "12/31/2005", "STATEN ISLAND"),
            raw(3, "02/29/2008", "QUEENS"),
        ]);
        let first = clean(&input, &mapping, DatePolicy::Strict).unwrap();

        let reprojected = RawTable {
            headers: vec![mapping.date.clone(), mapping.region.clone()],
            records: first
                .records
                .iter()
                .enumerate()
                .map(|(i, r)| r.to_raw(i + 1, &mapping.date, &mapping.region, &mapping.date_format))
                .collect(),
        };
        let second = clean(&reprojected, &mapping, DatePolicy::Strict).unwrap();

        assert_eq!(first.records, second.records);
    }

    #[test]
    fn does_not_mutate_input() {
        let input = table(vec![raw(1, "06/01/2005", "BROOKLYN")]);
        let before = input.clone();
        let _ = clean(&input, &FieldMapping::default(), DatePolicy::Strict).unwrap();
        assert_eq!(input, before);
    }
}
