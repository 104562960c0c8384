#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart payloads and the sinks that receive them.
//!
//! The pipeline hands finished aggregates to a [`ChartSink`] and never reads
//! anything back. [`charts_for`] builds the four standard charts; the
//! sinks decide what to do with them ([`JsonDirSink`] writes chart-ready
//! JSON documents, [`MemorySink`] keeps them for embedding and tests).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use incident_trends_analytics_models::{
    DateBin, IncidentSummary, RegionCount, TimeSeriesPoint,
};
use serde::Serialize;

/// Errors that can occur while handing charts to a sink.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing a chart failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A finished chart payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    /// Binned frequency of incidents over the full date span.
    DateHistogram {
        /// Contiguous bins in date order.
        bins: Vec<DateBin>,
    },
    /// Incidents per year.
    YearlyTrend {
        /// One point per year present.
        points: Vec<TimeSeriesPoint>,
    },
    /// Incidents per region over the dataset lifetime.
    RegionTotals {
        /// Bars, largest first.
        bars: Vec<RegionCount>,
    },
    /// Incidents per year, one series per region.
    RegionTrend {
        /// Region → yearly points.
        series: BTreeMap<String, Vec<TimeSeriesPoint>>,
    },
}

impl Chart {
    /// Stable file-friendly name for this chart.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DateHistogram { .. } => "date_histogram",
            Self::YearlyTrend { .. } => "yearly_trend",
            Self::RegionTotals { .. } => "region_totals",
            Self::RegionTrend { .. } => "region_trend",
        }
    }
}

/// Builds the four standard charts from a run's aggregates.
#[must_use]
pub fn charts_for(summary: &IncidentSummary, histogram: Vec<DateBin>) -> Vec<Chart> {
    let series = summary
        .year_region
        .regions()
        .into_iter()
        .map(|region| (region.to_owned(), summary.year_region.region_series(region)))
        .collect();

    vec![
        Chart::DateHistogram { bins: histogram },
        Chart::YearlyTrend {
            points: summary.yearly_series(),
        },
        Chart::RegionTotals {
            bars: summary.region_counts(),
        },
        Chart::RegionTrend { series },
    ]
}

/// Receives finished charts. Implementations must not feed anything back
/// into the pipeline.
pub trait ChartSink {
    /// Accepts one chart.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if the sink cannot store or emit the chart.
    fn accept(&mut self, chart: &Chart) -> Result<(), ReportError>;
}

/// Hands every chart to `sink`, stopping at the first failure.
///
/// # Errors
///
/// Returns the first [`ReportError`] raised by the sink.
pub fn publish(sink: &mut dyn ChartSink, charts: &[Chart]) -> Result<(), ReportError> {
    for chart in charts {
        log::debug!("Publishing chart {}", chart.name());
        sink.accept(chart)?;
    }
    Ok(())
}

/// Writes each chart to `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonDirSink {
    dir: PathBuf,
}

impl JsonDirSink {
    /// Creates a sink writing into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::Io`] if the directory cannot be created.
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, ReportError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// The output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes any serializable document as `<dir>/<name>.json`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if serialization or the write fails.
    pub fn write_json(&self, name: &str, value: &impl Serialize) -> Result<PathBuf, ReportError> {
        let path = self.dir.join(format!("{name}.json"));
        let body = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, body)?;
        log::info!("Wrote {}", path.display());
        Ok(path)
    }
}

impl ChartSink for JsonDirSink {
    fn accept(&mut self, chart: &Chart) -> Result<(), ReportError> {
        self.write_json(chart.name(), chart).map(|_| ())
    }
}

/// Keeps charts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    /// Charts received so far, in arrival order.
    pub charts: Vec<Chart>,
}

impl ChartSink for MemorySink {
    fn accept(&mut self, chart: &Chart) -> Result<(), ReportError> {
        self.charts.push(chart.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use incident_trends_analytics_models::YearRegionMatrix;

    use super::*;

    fn summary() -> IncidentSummary {
        let mut year_region = YearRegionMatrix::default();
        year_region.add(2005, "BROOKLYN", 1);
        year_region.add(2005, "BRONX", 1);
        year_region.add(2006, "BROOKLYN", 1);
        IncidentSummary {
            yearly_totals: BTreeMap::from([(2005, 2), (2006, 1)]),
            region_totals: BTreeMap::from([("BROOKLYN".to_owned(), 2), ("BRONX".to_owned(), 1)]),
            year_region,
        }
    }

    fn histogram() -> Vec<DateBin> {
        let day = NaiveDate::from_ymd_opt(2005, 6, 1).unwrap();
        vec![DateBin {
            start: day,
            end: day,
            count: 3,
        }]
    }

    #[test]
    fn builds_four_charts() {
        let charts = charts_for(&summary(), histogram());
        let names: Vec<&str> = charts.iter().map(Chart::name).collect();
        assert_eq!(
            names,
            vec!["date_histogram", "yearly_trend", "region_totals", "region_trend"]
        );

        let Chart::RegionTrend { series } = &charts[3] else {
            panic!("expected region trend");
        };
        assert_eq!(series["BROOKLYN"].len(), 2);
        assert_eq!(series["BRONX"].len(), 1);
    }

    #[test]
    fn memory_sink_collects_in_order() {
        let charts = charts_for(&summary(), histogram());
        let mut sink = MemorySink::default();
        publish(&mut sink, &charts).unwrap();
        assert_eq!(sink.charts, charts);
    }

    #[test]
    fn chart_json_is_tagged() {
        let charts = charts_for(&summary(), histogram());
        let json = serde_json::to_value(&charts[2]).unwrap();
        assert_eq!(json["kind"], "region_totals");
        assert_eq!(json["bars"][0]["region"], "BROOKLYN");
        assert_eq!(json["bars"][0]["count"], 2);

        let json = serde_json::to_value(&charts[0]).unwrap();
        assert_eq!(json["bins"][0]["start"], "2005-06-01");
    }

    #[test]
    fn json_dir_sink_writes_one_file_per_chart() {
        let dir = std::env::temp_dir().join(format!("incident_trends_report_{}", std::process::id()));
        let mut sink = JsonDirSink::new(&dir).unwrap();
        publish(&mut sink, &charts_for(&summary(), histogram())).unwrap();

        let body = std::fs::read_to_string(dir.join("yearly_trend.json")).unwrap();
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["points"][0]["period"], "2005");
        assert!(dir.join("region_trend.json").exists());

        std::fs::remove_dir_all(&dir).ok();
    }
}
