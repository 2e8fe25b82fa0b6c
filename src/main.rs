//! Transceiver Exporter binary
//!
//! Serves transceiver metrics for Prometheus, or prints a single scrape.

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use transceiver_exporter::{
    encode_text, start_web_server, CollectorConfig, FilterConfig, FixtureInspector, HardwareInspector,
    MetricSample, PowerUnit, SysfsInspector, TransceiverCollector, WebConfig, DEFAULT_LISTEN_ADDRESS,
    DEFAULT_METRICS_PATH,
};

#[derive(Parser)]
#[command(name = "transceiver-exporter")]
#[command(about = "Prometheus exporter for optical transceiver EEPROM and DOM data")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Address to listen on for web interface and telemetry
    #[arg(long = "web.listen-address", default_value = DEFAULT_LISTEN_ADDRESS)]
    listen_address: String,

    /// Path under which to expose metrics
    #[arg(long = "web.telemetry-path", default_value = DEFAULT_METRICS_PATH)]
    metrics_path: String,

    /// Collect interface features
    #[arg(
        long = "collector.interface-features.enable",
        default_value_t = true,
        action = ArgAction::Set,
        value_name = "BOOL"
    )]
    interface_features: bool,

    /// Report optical powers in dBm instead of mW
    #[arg(long = "collector.optical-power-in-dbm")]
    power_in_dbm: bool,

    #[command(flatten)]
    filter: FilterArgs,

    /// Serve data from a JSON fixture instead of the host
    #[arg(long = "inspector.fixture", value_name = "PATH")]
    fixture: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Args)]
struct FilterArgs {
    /// Comma separated list of interfaces to exclude
    #[arg(long = "exclude.interfaces", default_value = "")]
    exclude_interfaces: String,

    /// Comma separated list of interfaces to include
    #[arg(long = "include.interfaces", default_value = "")]
    include_interfaces: String,

    /// Regex of interfaces to exclude
    #[arg(long = "exclude.interfaces-regex", default_value = "")]
    exclude_interfaces_regex: String,

    /// Regex of interfaces to include
    #[arg(long = "include.interfaces-regex", default_value = "")]
    include_interfaces_regex: String,

    /// Don't report on interfaces being management DOWN
    #[arg(long = "exclude.interfaces-down")]
    exclude_interfaces_down: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server (default)
    Serve,

    /// Run a single scrape, print it and exit
    Snapshot(SnapshotArgs),

    /// Print the interfaces a scrape would query and exit
    Interfaces,
}

#[derive(Args)]
struct SnapshotArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Prometheus text exposition
    Text,
    /// Samples and interface errors as JSON
    Json,
}

#[derive(Serialize)]
struct SnapshotDocument<'a> {
    timestamp: DateTime<Utc>,
    samples: &'a [MetricSample],
    errors: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    let config = collector_config(&cli)?;
    match &cli.fixture {
        Some(path) => {
            let inspector = FixtureInspector::from_path(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            info!("Serving data from fixture {}", path.display());
            run(&cli, TransceiverCollector::new(inspector, config)).await
        }
        None => run(&cli, TransceiverCollector::new(SysfsInspector::new(), config)).await,
    }
}

fn init_logging(cli: &Cli) -> anyhow::Result<()> {
    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };

    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

fn collector_config(cli: &Cli) -> anyhow::Result<CollectorConfig> {
    let args = &cli.filter;
    let filter = FilterConfig::from_lists(
        &args.exclude_interfaces,
        &args.include_interfaces,
        &args.exclude_interfaces_regex,
        &args.include_interfaces_regex,
        args.exclude_interfaces_down,
    )?;
    filter.validate()?;

    Ok(CollectorConfig::default()
        .with_filter(filter)
        .with_interface_features(cli.interface_features)
        .with_power_unit(PowerUnit::from_dbm_flag(cli.power_in_dbm)))
}

async fn run<I: HardwareInspector>(cli: &Cli, collector: TransceiverCollector<I>) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Serve) | None => serve_command(cli, collector).await,
        Some(Commands::Snapshot(args)) => snapshot_command(args, collector).await,
        Some(Commands::Interfaces) => interfaces_command(collector),
    }
}

async fn serve_command<I: HardwareInspector>(cli: &Cli, collector: TransceiverCollector<I>) -> anyhow::Result<()> {
    info!("Starting transceiver exporter {}", env!("CARGO_PKG_VERSION"));

    let config = collector.config();
    let filter = &config.filter;
    info!("Collector configuration:");
    info!("  - Interface features: {}", config.collect_interface_features);
    info!("  - Optical power unit: {:?}", config.power_unit);
    info!("  - Excluded interfaces: {:?}", filter.excluded_names().collect::<Vec<_>>());
    info!("  - Included interfaces: {:?}", filter.included_names().collect::<Vec<_>>());
    info!("  - Exclude pattern: {:?}", filter.exclude_pattern());
    info!("  - Include pattern: {:?}", filter.include_pattern());
    info!("  - Exclude admin down: {}", filter.excludes_admin_down());

    let web_config = WebConfig::new(&cli.listen_address, &cli.metrics_path);
    start_web_server(web_config, collector).await?;

    Ok(())
}

async fn snapshot_command<I: HardwareInspector>(
    args: &SnapshotArgs,
    collector: TransceiverCollector<I>,
) -> anyhow::Result<()> {
    let report = collector.scrape().await.context("Scrape failed")?;

    match args.format {
        OutputFormat::Text => {
            print!("{}", encode_text(&collector.describe(), &report.samples)?);
        }
        OutputFormat::Json => {
            let document = SnapshotDocument {
                timestamp: Utc::now(),
                samples: &report.samples,
                errors: report.errors.iter().map(ToString::to_string).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }

    Ok(())
}

fn interfaces_command<I: HardwareInspector>(collector: TransceiverCollector<I>) -> anyhow::Result<()> {
    for name in collector.monitored_interfaces()? {
        println!("{}", name);
    }
    Ok(())
}
