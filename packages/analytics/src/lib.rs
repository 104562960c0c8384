#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregator: group-by counts over cleaned incident records.
//!
//! Every function here is a single pass over the records with one map entry
//! per distinct key. Nothing is cached or updated incrementally; callers
//! recompute from the full record set each run.

pub mod histogram;
pub mod ranking;

use std::collections::BTreeMap;

use chrono::Datelike as _;
use incident_trends_analytics_models::{
    IncidentSummary, TimeGranularity, TimeSeriesPoint, YearRegionMatrix,
};
use incident_trends_incident_models::IncidentRecord;

/// Year → incidents, covering only years present in `records`.
#[must_use]
pub fn yearly_totals(records: &[IncidentRecord]) -> BTreeMap<i32, u64> {
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.year()).or_insert(0) += 1;
    }
    totals
}

/// Region → incidents over the whole record set.
#[must_use]
pub fn region_totals(records: &[IncidentRecord]) -> BTreeMap<String, u64> {
    let mut totals: BTreeMap<String, u64> = BTreeMap::new();
    for record in records {
        if let Some(count) = totals.get_mut(&record.region) {
            *count += 1;
        } else {
            totals.insert(record.region.clone(), 1);
        }
    }
    totals
}

/// Year → region → incidents.
#[must_use]
pub fn year_region_matrix(records: &[IncidentRecord]) -> YearRegionMatrix {
    let mut matrix = YearRegionMatrix::default();
    for record in records {
        matrix.add(record.year(), &record.region, 1);
    }
    matrix
}

/// Computes all three aggregate mappings in one pass.
#[must_use]
pub fn summarize(records: &[IncidentRecord]) -> IncidentSummary {
    let mut summary = IncidentSummary::default();

    for record in records {
        let year = record.year();
        *summary.yearly_totals.entry(year).or_insert(0) += 1;
        if let Some(count) = summary.region_totals.get_mut(&record.region) {
            *count += 1;
        } else {
            summary.region_totals.insert(record.region.clone(), 1);
        }
        summary.year_region.add(year, &record.region, 1);
    }

    log::debug!(
        "Summarized {} records: {} years, {} regions, {} year/region cells",
        records.len(),
        summary.yearly_totals.len(),
        summary.region_totals.len(),
        summary.year_region.len()
    );

    summary
}

/// Incident counts per period, ascending. Periods without incidents are
/// omitted.
#[must_use]
pub fn series(records: &[IncidentRecord], granularity: TimeGranularity) -> Vec<TimeSeriesPoint> {
    let mut counts: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    for record in records {
        let key = match granularity {
            TimeGranularity::Monthly => (record.occur_date.year(), record.occur_date.month()),
            TimeGranularity::Yearly => (record.occur_date.year(), 0),
        };
        *counts.entry(key).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|((year, month), count)| TimeSeriesPoint {
            period: match granularity {
                TimeGranularity::Monthly => format!("{year:04}-{month:02}"),
                TimeGranularity::Yearly => format!("{year:04}"),
            },
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(y: i32, m: u32, d: u32, region: &str) -> IncidentRecord {
        IncidentRecord::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), region)
    }

    fn scenario() -> Vec<IncidentRecord> {
        vec![
            record(2005, 6, 1, "BROOKLYN"),
            record(2005, 7, 1, "BRONX"),
            record(2006, 1, 1, "BROOKLYN"),
        ]
    }

    #[test]
    fn yearly_totals_cover_present_years_only() {
        let totals = yearly_totals(&[record(2005, 1, 1, "BRONX"), record(2008, 1, 1, "BRONX")]);
        assert_eq!(totals, BTreeMap::from([(2005, 1), (2008, 1)]));
        assert!(!totals.contains_key(&2006));
    }

    #[test]
    fn scenario_aggregates() {
        let records = scenario();

        assert_eq!(yearly_totals(&records), BTreeMap::from([(2005, 2), (2006, 1)]));
        assert_eq!(
            region_totals(&records),
            BTreeMap::from([("BROOKLYN".to_owned(), 2), ("BRONX".to_owned(), 1)])
        );

        let matrix = year_region_matrix(&records);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(2005, "BROOKLYN"), Some(1));
        assert_eq!(matrix.get(2005, "BRONX"), Some(1));
        assert_eq!(matrix.get(2006, "BROOKLYN"), Some(1));
    }

    #[test]
    fn summarize_matches_individual_aggregates() {
        let records = scenario();
        let summary = summarize(&records);
        assert_eq!(summary.yearly_totals, yearly_totals(&records));
        assert_eq!(summary.region_totals, region_totals(&records));
        assert_eq!(summary.year_region, year_region_matrix(&records));
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn region_counts_sum_to_yearly_totals() {
        let regions = ["BRONX", "BROOKLYN", "MANHATTAN", "QUEENS", "STATEN ISLAND"];
        let mut records = Vec::new();
        for i in 0..500_u32 {
            let year = 2006 + i32::try_from(i % 7).unwrap();
            let month = 1 + (i * 5) % 12;
            let day = 1 + (i * 3) % 28;
            records.push(record(year, month, day, regions[(i as usize * 7) % regions.len()]));
        }

        let summary = summarize(&records);
        for (year, total) in &summary.yearly_totals {
            assert_eq!(summary.year_region.year_total(*year), *total, "year {year}");
        }
        assert_eq!(
            summary.region_totals.values().sum::<u64>(),
            summary.total()
        );
    }

    #[test]
    fn empty_input_yields_empty_aggregates() {
        let summary = summarize(&[]);
        assert!(summary.yearly_totals.is_empty());
        assert!(summary.region_totals.is_empty());
        assert!(summary.year_region.is_empty());
        assert!(series(&[], TimeGranularity::Monthly).is_empty());
    }

    #[test]
    fn monthly_series_is_sorted_and_sparse() {
        let records = vec![
            record(2006, 3, 4, "BRONX"),
            record(2005, 6, 1, "BRONX"),
            record(2005, 6, 20, "QUEENS"),
        ];
        let points = series(&records, TimeGranularity::Monthly);
        assert_eq!(
            points,
            vec![
                TimeSeriesPoint {
                    period: "2005-06".to_owned(),
                    count: 2
                },
                TimeSeriesPoint {
                    period: "2006-03".to_owned(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn yearly_series_matches_totals() {
        let records = scenario();
        let points = series(&records, TimeGranularity::Yearly);
        assert_eq!(points, summarize(&records).yearly_series());
    }
}
