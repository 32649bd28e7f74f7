//! CLI entry point for the rail alerts ETL tool.
//!
//! Converts raw MBTA alert snapshot CSVs into one compact JSON document
//! for the dashboard, and optionally fetches canonical route shapes for
//! the map overlay.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rail_alerts_etl::{
    aggregate::{
        aggregate_dir,
        build::{build_dashboard, empty_feature_collection},
    },
    fetch::BasicClient,
    geometry::shapes::fetch_route_shapes_or_empty,
    labels,
    output::{log_summary, write_json_file},
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

const DEFAULT_API_BASE: &str = "https://api-v3.mbta.com";

#[derive(Parser)]
#[command(name = "rail_alerts_etl")]
#[command(about = "Preprocess rail alert CSVs into dashboard JSON", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Aggregate alert CSVs and write the dashboard JSON
    Aggregate {
        /// Directory containing alert CSV exports
        #[arg(short, long, default_value = "Alerts_2025")]
        data_dir: String,

        /// Output JSON file
        #[arg(short, long, default_value = "alerts_data.json")]
        output: String,

        /// Skip the route-shape fetch and emit an empty map overlay
        #[arg(long, default_value_t = false)]
        no_shapes: bool,
    },
    /// Fetch and decode canonical route shapes only
    Shapes {
        /// Route ids to fetch, comma separated (defaults to all known rail routes)
        #[arg(short, long, value_delimiter = ',')]
        routes: Vec<String>,

        /// Output GeoJSON file
        #[arg(short, long, default_value = "route_shapes.json")]
        output: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rail_alerts_etl.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rail_alerts_etl.log"));

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
        Commands::Aggregate {
            data_dir,
            output,
            no_shapes,
        } => run_aggregate(&data_dir, &output, no_shapes).await?,
        Commands::Shapes { routes, output } => run_shapes(routes, &output).await?,
    }

    Ok(())
}

fn api_base() -> String {
    std::env::var("MBTA_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
}

/// Full pipeline: CSVs -> aggregates -> shape overlay -> one JSON file.
#[tracing::instrument(fields(data_dir, output, no_shapes))]
async fn run_aggregate(data_dir: &str, output: &str, no_shapes: bool) -> Result<()> {
    let (agg, canonical, skipped) = aggregate_dir(Path::new(data_dir))?;
    info!(
        unique_alerts = canonical.distinct_alerts(),
        alert_months = agg.alert_month_count(),
        skipped_rows = skipped,
        "CSV aggregation complete"
    );

    let shapes = if no_shapes {
        empty_feature_collection()
    } else {
        // Only request shapes for routes the color table knows about
        let route_ids: Vec<String> = agg
            .ranked_routes()
            .into_iter()
            .filter(|id| labels::is_known_route(id))
            .collect();
        let client = BasicClient::new()?;
        fetch_route_shapes_or_empty(&client, &api_base(), &route_ids).await
    };

    let data = build_dashboard(&agg, &canonical, shapes);
    write_json_file(output, &data)?;
    log_summary(&data);
    Ok(())
}

/// Standalone shape fetch, written as a GeoJSON FeatureCollection.
#[tracing::instrument(fields(output))]
async fn run_shapes(routes: Vec<String>, output: &str) -> Result<()> {
    let route_ids = if routes.is_empty() {
        labels::ROUTE_COLORS
            .iter()
            .map(|(id, _)| id.to_string())
            .collect()
    } else {
        routes
    };

    let client = BasicClient::new()?;
    let collection = fetch_route_shapes_or_empty(&client, &api_base(), &route_ids).await;
    write_json_file(output, &collection)?;
    info!(features = collection.features.len(), "Shape fetch complete");
    Ok(())
}
