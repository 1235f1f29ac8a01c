//! CLI entry point for the stolen-vehicle batch pipeline.
//!
//! Provides subcommands for running a full batch, listing rising monthly
//! trends, and validating source files without producing output.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vehicle_theft_etl::{
    analyzers::trend::rising_trends,
    audit::{AuditHook, JsonLinesAudit, NoAudit, TracingAudit},
    config::PipelineConfig,
    loader::InputPaths,
    output::{csv_path, print_json, write_csv, write_json},
    pipeline::{load_and_clean, run},
};

#[derive(Parser)]
#[command(name = "vehicle_theft_etl")]
#[command(about = "Clean and analyze stolen-vehicle datasets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Locations CSV (location_id,region,country,population,density)
    #[arg(long, default_value = "data/locations.csv")]
    locations: PathBuf,

    /// Stolen vehicles CSV
    #[arg(long, default_value = "data/stolen_vehicles.csv")]
    vehicles: PathBuf,

    /// Make details CSV (make_id,make_name,make_type)
    #[arg(long, default_value = "data/make_details.csv")]
    makes: PathBuf,

    /// JSON file with extra date repairs and accepted date formats
    #[arg(long)]
    config: Option<String>,
}

impl InputArgs {
    fn paths(&self) -> InputPaths {
        InputPaths {
            locations: self.locations.clone(),
            vehicles: self.vehicles.clone(),
            makes: self.makes.clone(),
        }
    }

    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let path = self
            .config
            .clone()
            .or_else(|| std::env::var("THEFT_ETL_CONFIG").ok());

        match path {
            Some(path) => {
                info!(path = %path, "Loading pipeline config");
                Ok(PipelineConfig::load(&path)?)
            }
            None => Ok(PipelineConfig::default()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full batch and write the summary, trends and report
    Run {
        #[command(flatten)]
        input: InputArgs,

        /// Directory to write summary.csv, trends.csv and report.json into
        #[arg(short, long, default_value = "output")]
        output_dir: PathBuf,

        /// Gzip compress the CSV outputs
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Optional: append an audit entry per ingested vehicle to this file
        #[arg(long)]
        audit_log: Option<PathBuf>,
    },
    /// Log the (location, month) pairs whose theft count rises into the next month
    Trends {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Load and clean the source files without writing anything
    Validate {
        #[command(flatten)]
        input: InputArgs,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/vehicle_theft_etl.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vehicle_theft_etl.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            output_dir,
            gzip,
            audit_log,
        } => {
            let config = input.pipeline_config()?;
            let mut hook: Box<dyn AuditHook> = match audit_log {
                Some(path) => Box::new(JsonLinesAudit::open(&path)?),
                None => Box::new(TracingAudit),
            };

            let output = run(&input.paths(), &config, hook.as_mut())?;

            std::fs::create_dir_all(&output_dir)?;
            let summary_path = csv_path(&output_dir, "summary", gzip);
            let trends_path = csv_path(&output_dir, "trends", gzip);
            let report_path = output_dir.join("report.json");

            write_csv(&summary_path, &output.summary, gzip)?;
            write_csv(&trends_path, &output.report.rising_trends, gzip)?;
            write_json(&report_path, &output.report)?;

            info!(
                summary = %summary_path.display(),
                trends = %trends_path.display(),
                report = %report_path.display(),
                "Batch written"
            );
        }
        Commands::Trends { input } => {
            let config = input.pipeline_config()?;
            let batch = load_and_clean(&input.paths(), &config, &mut NoAudit)?;
            let rising = rising_trends(&batch.vehicles, &batch.locations);

            if rising.is_empty() {
                warn!("No rising month-over-month trends found");
            } else {
                info!(rows = rising.len(), "Rising month-over-month trends");
                print_json(&rising)?;
            }
        }
        Commands::Validate { input } => {
            let config = input.pipeline_config()?;
            let batch = load_and_clean(&input.paths(), &config, &mut NoAudit)?;

            info!(
                locations = batch.locations.len(),
                vehicles = batch.vehicles.len(),
                makes = batch.makes.len(),
                "Batch is valid"
            );
        }
    }

    Ok(())
}
