#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the incident trends toolchain.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use incident_trends_clean::DatePolicy;
use incident_trends_cli::pipeline::{
    DEFAULT_HISTOGRAM_BINS, DEFAULT_RANK_LIMIT, PipelineConfig, PipelineError, PipelineOutput,
    run_pipeline,
};
use incident_trends_cli_utils::{IndicatifProgress, init_logger};
use incident_trends_report::JsonDirSink;
use incident_trends_source::registry::{DEFAULT_DATASET_ID, all_datasets, find_dataset};
use incident_trends_source::{FetchOptions, SourceLocation};

#[derive(Parser)]
#[command(
    name = "incident_trends",
    about = "Exploratory summaries of published incident datasets",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Load, clean and summarize a dataset (the default)
    Run(RunArgs),
    /// List the embedded dataset definitions
    Datasets,
}

#[derive(Args, Clone)]
struct RunArgs {
    /// Dataset identifier (e.g., "`nypd_shootings`")
    #[arg(long, default_value = DEFAULT_DATASET_ID)]
    dataset: String,
    /// Read from this URL or file instead of the dataset's download URL
    #[arg(long)]
    source: Option<String>,
    /// Maximum number of records to load (for testing)
    #[arg(long)]
    limit: Option<u64>,
    /// Number of years in the top/bottom rankings
    #[arg(long, default_value_t = DEFAULT_RANK_LIMIT)]
    top: usize,
    /// Number of bins in the date histogram
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,
    /// Skip and log rows with unparseable dates instead of failing
    #[arg(long)]
    skip_bad_dates: bool,
    /// Write chart JSON documents and `summary.json` into this directory
    #[arg(long)]
    out: Option<PathBuf>,
}

impl RunArgs {
    fn into_config(self) -> Result<PipelineConfig, PipelineError> {
        let dataset = find_dataset(&self.dataset)
            .ok_or_else(|| PipelineError::UnknownDataset(self.dataset.clone()))?;

        let mut config = PipelineConfig::new(dataset);
        config.location = self.source.as_deref().map(SourceLocation::parse);
        config.fetch = FetchOptions { limit: self.limit };
        config.rank_limit = self.top;
        config.histogram_bins = self.bins;
        if self.skip_bad_dates {
            config.date_policy = DatePolicy::SkipAndLog;
        }
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = init_logger();
    let cli = Cli::parse();

    let args = match cli.command {
        Some(Commands::Datasets) => {
            let datasets = all_datasets();
            println!("{:<20} NAME", "ID");
            println!("{}", "-".repeat(50));
            for dataset in &datasets {
                println!("{:<20} {}", dataset.id, dataset.name);
            }
            return Ok(());
        }
        Some(Commands::Run(args)) => args,
        None => cli.run,
    };

    let out = args.out.clone();
    let config = args.into_config()?;
    let location = config
        .location
        .clone()
        .unwrap_or_else(|| config.dataset.location());

    let progress =
        IndicatifProgress::load_spinner(&multi, &format!("[{}] Loading {location}", config.dataset.id));
    let output = run_pipeline(&config, &progress).await?;

    print_summary(&output);

    if let Some(dir) = out {
        let mut sink = JsonDirSink::new(&dir)?;
        output.publish(&mut sink)?;
        sink.write_json("summary", &output)?;
    }

    Ok(())
}

fn print_summary(output: &PipelineOutput) {
    let report = &output.validation;
    println!(
        "Dataset {}: {} of {} rows retained",
        output.dataset_id, report.retained_rows, report.total_rows
    );
    if report.missing_total() > 0 {
        for (column, count) in report.missing.iter().filter(|(_, c)| **c > 0) {
            println!("  missing {column}: {count}");
        }
    }
    if !report.skipped_rows.is_empty() {
        println!("  skipped rows: {}", report.skipped_rows.len());
    }
    for (region, count) in &report.unknown_regions {
        println!("  unknown region {region:?}: {count}");
    }

    println!();
    println!("{:<8} INCIDENTS", "YEAR");
    println!("{}", "-".repeat(20));
    for (year, count) in &output.summary.yearly_totals {
        println!("{year:<8} {count}");
    }

    println!();
    println!("{:<16} INCIDENTS", "REGION");
    println!("{}", "-".repeat(28));
    for bar in output.summary.region_counts() {
        println!("{:<16} {}", bar.region, bar.count);
    }

    println!();
    let top: Vec<String> = output
        .top_years
        .iter()
        .map(|y| format!("{} ({})", y.year, y.count))
        .collect();
    let bottom: Vec<String> = output
        .bottom_years
        .iter()
        .map(|y| format!("{} ({})", y.year, y.count))
        .collect();
    println!("Top years:    {}", top.join(", "));
    println!("Bottom years: {}", bottom.join(", "));
}
