//! CLI entry point for the crosswalk comparison tool.
//!
//! Provides subcommands for running the full tract-vs-crosswalk comparison
//! and for dumping grouped medians on their own.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use crosswalk_compare::{
    compare::{assemble, coverage},
    crosswalk::redistribute,
    fetch::{BasicClient, fetch_bytes},
    input::{load_crosswalk, load_sales},
    median::{GroupKey, Measure, by_key, group_medians},
    output::{print_summary_json, write_comparison, write_medians},
    summary::MarketSummary,
};
use std::ffi::OsStr;
use std::fs::File;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "crosswalk_compare")]
#[command(about = "Compare direct tract sale-price medians against ZIP-crosswalked estimates", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupBy {
    Tract,
    Zip,
}

impl From<GroupBy> for GroupKey {
    fn from(g: GroupBy) -> Self {
        match g {
            GroupBy::Tract => GroupKey::Tract,
            GroupBy::Zip => GroupKey::Zip,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PriceColumn {
    Close,
    List,
}

impl From<PriceColumn> for Measure {
    fn from(p: PriceColumn) -> Self {
        match p {
            PriceColumn::Close => Measure::ClosePrice,
            PriceColumn::List => Measure::ListPrice,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full comparison: direct tract medians vs crosswalked estimates
    Compare {
        /// Path or URL of the compiled sales CSV
        #[arg(value_name = "SALES_FILE_OR_URL")]
        sales: String,

        /// Path to the tract-to-ZIP crosswalk CSV
        #[arg(short, long)]
        crosswalk: String,

        /// Sell year to compare
        #[arg(short, long, default_value = "2024")]
        year: String,

        /// CSV file to write the comparison table to
        #[arg(short, long, default_value = "comparison.csv")]
        output: String,
    },
    /// Compute grouped medians from the sales table
    Medians {
        /// Path or URL of the compiled sales CSV
        #[arg(value_name = "SALES_FILE_OR_URL")]
        sales: String,

        /// Identifier to group by
        #[arg(short, long, value_enum, default_value = "tract")]
        by: GroupBy,

        /// Price column to take the median over
        #[arg(short, long, value_enum, default_value = "close")]
        measure: PriceColumn,

        /// Sell year to include
        #[arg(short, long, default_value = "2024")]
        year: String,

        /// CSV file to write the median table to
        #[arg(short, long, default_value = "medians.csv")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/crosswalk_compare.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("crosswalk_compare.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compare {
            sales,
            crosswalk,
            year,
            output,
        } => {
            run_compare(&sales, &crosswalk, &year, &output).await?;
        }
        Commands::Medians {
            sales,
            by,
            measure,
            year,
            output,
        } => {
            let bytes = fetcher(&sales).await?;
            let records = load_sales(bytes.as_slice())?;

            let medians = group_medians(&records, by.into(), measure.into(), &year);
            write_medians(&output, &medians)?;
        }
    }

    Ok(())
}

/// Runs the full pipeline: load, summarize, aggregate both ways,
/// redistribute, assemble, write.
#[tracing::instrument(skip(sales_source, crosswalk_path, output))]
async fn run_compare(
    sales_source: &str,
    crosswalk_path: &str,
    year: &str,
    output: &str,
) -> Result<()> {
    let bytes = fetcher(sales_source).await?;
    let records = load_sales(bytes.as_slice())?;
    let edges = load_crosswalk(File::open(crosswalk_path)?)?;

    let summary = MarketSummary::from_records(&records, year);
    print_summary_json(&summary)?;

    let tract_medians = group_medians(&records, GroupKey::Tract, Measure::ClosePrice, year);
    let zip_medians = group_medians(&records, GroupKey::Zip, Measure::ClosePrice, year);
    info!(
        tracts = tract_medians.len(),
        zips = zip_medians.len(),
        "Grouped medians computed"
    );

    let estimates = redistribute(&edges, &by_key(zip_medians));
    let rows = assemble(&tract_medians, &estimates);

    let c = coverage(&rows);
    info!(
        rows = c.rows,
        both_present = c.both_present,
        direct_only = c.direct_only,
        estimate_only = c.estimate_only,
        neither = c.neither,
        "Comparison assembled"
    );

    write_comparison(output, &rows)?;
    Ok(())
}

/// Loads table data from a local file path or fetches it over HTTP.
#[tracing::instrument(fields(source = %source))]
async fn fetcher(source: &str) -> Result<Vec<u8>> {
    let bytes = if source.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, source).await?
    } else {
        std::fs::read(source)?
    };
    Ok(bytes)
}
