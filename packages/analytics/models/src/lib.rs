#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate result types.
//!
//! These are the terminal, consumer-facing values of a pipeline run: once
//! produced they are only read (by the report sinks and the CLI summary).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Granularity for time-series aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    /// Monthly counts (`YYYY-MM`).
    Monthly,
    /// Yearly counts (`YYYY`).
    Yearly,
}

impl std::fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Monthly => write!(f, "month"),
            Self::Yearly => write!(f, "year"),
        }
    }
}

/// A time-series data point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    /// Period label (e.g. `"2006"` or `"2006-08"`).
    pub period: String,
    /// Total incident count in this period.
    pub count: u64,
}

/// Incident count for one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// Region label.
    pub region: String,
    /// Number of incidents.
    pub count: u64,
}

/// A year and its incident total, as returned by the rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedYear {
    /// Calendar year.
    pub year: i32,
    /// Incidents that year.
    pub count: u64,
}

/// One bar of the binned date histogram. `start` and `end` are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBin {
    /// First day in the bin.
    pub start: NaiveDate,
    /// Last day in the bin.
    pub end: NaiveDate,
    /// Incidents dated within the bin.
    pub count: u64,
}

/// Year → region → incident count.
///
/// Only `(year, region)` pairs that occur in the data have entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct YearRegionMatrix {
    cells: BTreeMap<i32, BTreeMap<String, u64>>,
}

impl YearRegionMatrix {
    /// Adds `count` incidents to the `(year, region)` cell.
    pub fn add(&mut self, year: i32, region: &str, count: u64) {
        let row = self.cells.entry(year).or_default();
        if let Some(cell) = row.get_mut(region) {
            *cell += count;
        } else {
            row.insert(region.to_owned(), count);
        }
    }

    /// Count for `(year, region)`, or `None` if that pair never occurs.
    #[must_use]
    pub fn get(&self, year: i32, region: &str) -> Option<u64> {
        self.cells.get(&year)?.get(region).copied()
    }

    /// Sum across regions for `year`.
    #[must_use]
    pub fn year_total(&self, year: i32) -> u64 {
        self.cells
            .get(&year)
            .map_or(0, |row| row.values().sum())
    }

    /// Years with at least one incident, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.cells.keys().copied()
    }

    /// Distinct region labels, sorted.
    #[must_use]
    pub fn regions(&self) -> Vec<&str> {
        let mut regions: Vec<&str> = self
            .cells
            .values()
            .flat_map(|row| row.keys().map(String::as_str))
            .collect();
        regions.sort_unstable();
        regions.dedup();
        regions
    }

    /// Every populated cell as `((year, region), count)`, ordered by year
    /// then region.
    pub fn iter(&self) -> impl Iterator<Item = ((i32, &str), u64)> + '_ {
        self.cells.iter().flat_map(|(year, row)| {
            row.iter()
                .map(move |(region, count)| ((*year, region.as_str()), *count))
        })
    }

    /// The yearly series for one region, skipping years it has no entry.
    #[must_use]
    pub fn region_series(&self, region: &str) -> Vec<TimeSeriesPoint> {
        self.cells
            .iter()
            .filter_map(|(year, row)| {
                row.get(region).map(|count| TimeSeriesPoint {
                    period: year.to_string(),
                    count: *count,
                })
            })
            .collect()
    }

    /// Number of populated cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no cell is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// The three aggregate mappings of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentSummary {
    /// Year → incidents. Years without incidents are absent.
    pub yearly_totals: BTreeMap<i32, u64>,
    /// Region → incidents over the whole dataset.
    pub region_totals: BTreeMap<String, u64>,
    /// Year → region → incidents.
    pub year_region: YearRegionMatrix,
}

impl IncidentSummary {
    /// Total incidents summarized.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.yearly_totals.values().sum()
    }

    /// Region totals as a list, largest first (ties by label).
    #[must_use]
    pub fn region_counts(&self) -> Vec<RegionCount> {
        let mut counts: Vec<RegionCount> = self
            .region_totals
            .iter()
            .map(|(region, count)| RegionCount {
                region: region.clone(),
                count: *count,
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count));
        counts
    }

    /// Yearly totals as an ascending time series.
    #[must_use]
    pub fn yearly_series(&self) -> Vec<TimeSeriesPoint> {
        self.yearly_totals
            .iter()
            .map(|(year, count)| TimeSeriesPoint {
                period: year.to_string(),
                count: *count,
            })
            .collect()
    }
}
