//! Uptime Reporter Binary

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptime_reporter::aggregate::ServiceModes;
use uptime_reporter::report::compose_report;
use uptime_reporter::{
    Config, Observation, ReportRunner, ReporterError, Result, UptimeStore, WebhookNotifier,
};

#[derive(Parser)]
#[command(name = "uptime_reporter", version, about = "Uptime log aggregation and chat reporting")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Append one observation to the uptime log (used by the external
    /// browser and probe checks)
    Record {
        /// Service name the observation belongs to
        #[arg(long)]
        service: String,

        /// Record the check as up
        #[arg(long, conflicts_with = "down")]
        up: bool,

        /// Record the check as down
        #[arg(long)]
        down: bool,

        /// Record a latency measurement in milliseconds
        #[arg(long)]
        latency_ms: Option<f64>,
    },

    /// Run one aggregate-and-notify cycle against the configured webhooks
    Report,

    /// Compose the report and print it to stdout without sending
    Analyse,
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    initialize_tracing();

    let cli = Cli::parse();
    let config = Config::from_env();

    if let Err(e) = config.validate() {
        error!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run_command(cli.command, config).await {
        error!("Run failed: {}", e);
        std::process::exit(1);
    }
}

async fn run_command(command: Command, config: Config) -> Result<()> {
    match command {
        Command::Record {
            service,
            up,
            down,
            latency_ms,
        } => record(&config, &service, up, down, latency_ms),
        Command::Report => report(config).await,
        Command::Analyse => analyse(&config),
    }
}

fn record(
    config: &Config,
    service: &str,
    up: bool,
    down: bool,
    latency_ms: Option<f64>,
) -> Result<()> {
    if !up && !down && latency_ms.is_none() {
        return Err(ReporterError::Config(
            "record needs --up, --down, or --latency-ms".to_string(),
        ));
    }

    let mut observation = Observation::new(Utc::now());
    if up || down {
        observation = observation.with_status(service, up)?;
    }
    if let Some(ms) = latency_ms {
        observation = observation.with_latency(service, ms)?;
    }

    let mut store = UptimeStore::load(&config.store_path)?;
    store.append(observation)?;

    info!("Recorded observation for {}", service);
    Ok(())
}

async fn report(config: Config) -> Result<()> {
    if let Err(e) = config.validate_webhooks() {
        return Err(ReporterError::Config(e));
    }

    let notifier = WebhookNotifier::new(config.http_timeout)?;
    let runner = ReportRunner::new(config, Box::new(notifier));
    let summary = runner.run().await?;

    info!(
        "Run {} complete - {} records, {} services, report delivered: {}, alarm raised: {}",
        summary.run_id,
        summary.records,
        summary.services.len(),
        summary.report_delivery.success,
        summary.alarm_delivery.is_some()
    );

    Ok(())
}

fn analyse(config: &Config) -> Result<()> {
    let store = UptimeStore::load(&config.store_path)?;
    let modes = ServiceModes::new(&config.latency_services);
    let report = compose_report(store.records(), Utc::now(), &config.windows, &modes);

    println!("{}", report);
    Ok(())
}

/// Initialize structured logging
fn initialize_tracing() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .json();

    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&log_level))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
