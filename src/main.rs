/// Version injected at compile time via ARMCOST_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("ARMCOST_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use armcost::azure::http::CatalogHttpClient;
use armcost::config::Config;
use armcost::pricing::{CapacityTiers, PriceCatalogClient};
use armcost::resource::get_registry;
use armcost::whatif::parse_changes;
use armcost::{RunContext, WhatIfProcessor};
use clap::{Parser, ValueEnum};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Estimate the monthly cost of an ARM what-if result
#[derive(Parser, Debug)]
#[command(name = "armcost", version, about, long_about = None)]
struct Args {
    /// What-if JSON document (`-` reads stdin)
    whatif_file: String,

    /// Currency code for catalog prices
    #[arg(short, long)]
    currency: Option<String>,

    /// Don't list the catalog meters behind each resource
    #[arg(long)]
    disable_detailed_metrics: bool,

    /// Also write the estimation as JSON to this file
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Price catalog endpoint
    #[arg(long)]
    catalog_url: Option<String>,

    /// Catalog request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Config file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn setup_logging(
    level: LogLevel,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter()));

    let Some(log_path) = log_file else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
        return Ok(None);
    };

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("armcost {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn read_input(source: &str) -> Result<String> {
    if source == "-" {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .context("Failed to read what-if document from stdin")?;
        return Ok(content);
    }

    std::fs::read_to_string(source).with_context(|| format!("Failed to read {}", source))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level, args.log_file.as_deref())?;

    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let changes = parse_changes(&read_input(&args.whatif_file)?)?;
    tracing::info!("Loaded {} changes from {}", changes.len(), args.whatif_file);

    let tiers = CapacityTiers::load(config.capacity_tiers_path())?;
    let http = CatalogHttpClient::new(config.effective_timeout(args.timeout))
        .context("Failed to create HTTP client")?;
    let client = PriceCatalogClient::new(
        http,
        &config.effective_catalog_url(args.catalog_url.as_deref()),
        &config.effective_currency(args.currency.as_deref()),
    )?;

    let processor = WhatIfProcessor::new(&client, get_registry(), &tiers).with_detailed_metrics(
        !config.effective_disable_detailed_metrics(args.disable_detailed_metrics),
    );

    let mut ctx = RunContext::new();
    let estimation = processor.process(&changes, &mut ctx).await?;

    print!("{}", estimation.report);

    if let Some(path) = &args.json_output {
        let json = serde_json::to_string_pretty(&estimation.output)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    Ok(())
}
