//! Load → clean → aggregate pipeline.
//!
//! Each stage takes the previous stage's output by reference and returns a
//! new value; nothing is shared between runs. Any stage error aborts the
//! run and no partial [`PipelineOutput`] is produced.

use std::sync::Arc;
use std::time::Instant;

use incident_trends_analytics::histogram::date_histogram;
use incident_trends_analytics::ranking::{bottom_years, top_years};
use incident_trends_analytics::{series, summarize};
use incident_trends_analytics_models::{
    DateBin, IncidentSummary, RankedYear, TimeGranularity, TimeSeriesPoint,
};
use incident_trends_clean::{CleanError, DatePolicy, ValidationReport, clean};
use incident_trends_incident_models::IncidentRecord;
use incident_trends_report::{Chart, ChartSink, ReportError, charts_for, publish};
use incident_trends_source::dataset_def::DatasetDefinition;
use incident_trends_source::load::load_dataset;
use incident_trends_source::progress::ProgressCallback;
use incident_trends_source::{FetchOptions, LoadError, SourceLocation};
use serde::Serialize;

/// Number of years listed in the top/bottom rankings by default.
pub const DEFAULT_RANK_LIMIT: usize = 5;

/// Number of bins in the date histogram by default.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// Errors that abort a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The source could not be read.
    #[error("Fetch error: {0}")]
    Fetch(#[source] LoadError),

    /// The source was read but is not a usable table.
    #[error("Parse error: {0}")]
    Parse(#[source] LoadError),

    /// A record's date did not parse.
    #[error("Date parse error: {0}")]
    DateParse(#[from] CleanError),

    /// A chart sink failed.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// No embedded dataset has the requested id.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}

impl From<LoadError> for PipelineError {
    fn from(e: LoadError) -> Self {
        if e.is_fetch() {
            Self::Fetch(e)
        } else {
            Self::Parse(e)
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// The dataset to analyze.
    pub dataset: DatasetDefinition,
    /// Overrides the dataset's download URL (e.g. a local export).
    pub location: Option<SourceLocation>,
    /// Loader options.
    pub fetch: FetchOptions,
    /// What to do with unparseable dates.
    pub date_policy: DatePolicy,
    /// How many years the top/bottom rankings list.
    pub rank_limit: usize,
    /// Number of bins in the date histogram.
    pub histogram_bins: usize,
}

impl PipelineConfig {
    /// Default configuration for `dataset`: strict dates, no record limit.
    #[must_use]
    pub fn new(dataset: DatasetDefinition) -> Self {
        Self {
            dataset,
            location: None,
            fetch: FetchOptions::default(),
            date_policy: DatePolicy::Strict,
            rank_limit: DEFAULT_RANK_LIMIT,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Terminal artifacts of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutput {
    /// Dataset the run analyzed.
    pub dataset_id: String,
    /// Advisory diagnostics from the cleaner.
    pub validation: ValidationReport,
    /// Yearly, regional and year x region counts.
    pub summary: IncidentSummary,
    /// Years with the most incidents, largest first.
    pub top_years: Vec<RankedYear>,
    /// Years with the fewest incidents, smallest first.
    pub bottom_years: Vec<RankedYear>,
    /// Incidents per month.
    pub monthly: Vec<TimeSeriesPoint>,
    /// Binned frequency over the full date span.
    pub histogram: Vec<DateBin>,
}

impl PipelineOutput {
    /// The four standard charts for this run.
    #[must_use]
    pub fn charts(&self) -> Vec<Chart> {
        charts_for(&self.summary, self.histogram.clone())
    }

    /// Hands every chart to `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Report`] if the sink fails.
    pub fn publish(&self, sink: &mut dyn ChartSink) -> Result<(), PipelineError> {
        publish(sink, &self.charts())?;
        Ok(())
    }
}

/// The aggregation stage on its own: summary, rankings, monthly series and
/// histogram over already-cleaned records.
#[must_use]
pub fn aggregate(
    dataset_id: &str,
    records: &[IncidentRecord],
    validation: ValidationReport,
    rank_limit: usize,
    histogram_bins: usize,
) -> PipelineOutput {
    let summary = summarize(records);
    let top_years = top_years(&summary.yearly_totals, rank_limit);
    let bottom_years = bottom_years(&summary.yearly_totals, rank_limit);

    PipelineOutput {
        dataset_id: dataset_id.to_owned(),
        validation,
        top_years,
        bottom_years,
        monthly: series(records, TimeGranularity::Monthly),
        histogram: date_histogram(records, histogram_bins),
        summary,
    }
}

/// Runs the full pipeline once.
///
/// # Errors
///
/// Returns [`PipelineError::Fetch`] or [`PipelineError::Parse`] if the
/// table cannot be loaded, and [`PipelineError::DateParse`] if a date does
/// not parse under [`DatePolicy::Strict`].
pub async fn run_pipeline(
    config: &PipelineConfig,
    progress: &Arc<dyn ProgressCallback>,
) -> Result<PipelineOutput, PipelineError> {
    let start = Instant::now();
    let id = &config.dataset.id;

    let raw = load_dataset(
        &config.dataset,
        config.location.as_ref(),
        &config.fetch,
        progress,
    )
    .await?;

    let cleaned = clean(&raw, &config.dataset.fields, config.date_policy)?;
    drop(raw);

    let output = aggregate(
        id,
        &cleaned.records,
        cleaned.report,
        config.rank_limit,
        config.histogram_bins,
    );

    log::info!(
        "[{id}] Pipeline complete: {} incidents across {} years and {} regions in {:.1}s",
        output.summary.total(),
        output.summary.yearly_totals.len(),
        output.summary.region_totals.len(),
        start.elapsed().as_secs_f64()
    );

    Ok(output)
}
