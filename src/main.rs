//! Command-line interface for alert-loadgen
//!
//! # Usage Examples
//!
//! ## Full Process Run
//! ```bash
//! # Boilerplate canary, then burst or continuous load from the config file
//! alert-loadgen process --config loadgen.yaml --create-topic
//! ```
//!
//! ## Load Only
//! ```bash
//! # Unpaced burst of 10k sampled alerts
//! alert-loadgen burst --count 10000 \
//!   --severity-dist "HIGH:10,MEDIUM:30,LOW:60" \
//!   --kafka-brokers localhost:9092 --topic alerts
//!
//! # 50 alerts/s for five minutes, logged instead of published
//! alert-loadgen continuous --rate 50 --duration 5m --dry-run
//! ```
//!
//! ## Functional Checks
//! ```bash
//! # Canonical LOW/test-source/test-name alert first, then load from config
//! alert-loadgen test --config loadgen.yaml
//!
//! # A single hand-written alert
//! alert-loadgen send --severity HIGH --source db --name deadlock \
//!   --context environment=prod --context region=eu-west-1
//! ```
//!
//! Ctrl-C stops the running job cleanly; a cancelled job exits with status 0
//! and a failed job with status 1.

use alert_generator::{custom_alert_with_context, AlertSampler};
use alert_loadgen::config::parse_duration;
use alert_loadgen::{parse_context_entry, GeneratorConfig, GeneratorOpts};
use alert_publisher::{KafkaPublisher, LogPublisher, Publisher};
use alert_scheduler::{CounterMetrics, JobMode, Pacing, Scheduler};
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "alert-loadgen")]
#[command(about = "Generate synthetic alerts and publish them to Kafka at a controlled rate")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the boilerplate canary alert, then run load from the config
    Process {
        #[command(flatten)]
        opts: GeneratorOpts,
    },

    /// Publish a fixed number of sampled alerts as fast as possible
    Burst {
        /// Number of alerts to publish
        #[arg(long)]
        count: u64,

        #[command(flatten)]
        opts: GeneratorOpts,
    },

    /// Publish sampled alerts at a target rate for a fixed duration
    Continuous {
        /// Target alerts per second
        #[arg(long)]
        rate: f64,

        /// How long to run (format: "300", "30s", "5m", "1h", "250ms")
        #[arg(long, value_parser = parse_duration)]
        duration: Duration,

        #[command(flatten)]
        opts: GeneratorOpts,
    },

    /// Publish the canonical test alert first, then run load from the config
    Test {
        #[command(flatten)]
        opts: GeneratorOpts,
    },

    /// Publish one alert with the given fields
    Send {
        #[arg(long)]
        severity: String,

        #[arg(long)]
        source: String,

        #[arg(long)]
        name: String,

        /// Context entry (format: key=value), may be repeated
        #[arg(long = "context", value_name = "KEY=VALUE", value_parser = parse_context_entry)]
        context: Vec<(String, String)>,

        #[command(flatten)]
        opts: GeneratorOpts,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing, defaulting to info when RUST_LOG is unset
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Process { opts } => {
            let config = opts.load_config()?;
            let mode = JobMode::Process(config.pacing());
            run_job(config, opts.dry_run, mode).await
        }
        Commands::Burst { count, opts } => {
            let mut config = opts.load_config()?;
            config.burst_size = count;
            run_job(config, opts.dry_run, JobMode::Load(Pacing::Burst { count })).await
        }
        Commands::Continuous {
            rate,
            duration,
            opts,
        } => {
            let mut config = opts.load_config()?;
            config.burst_size = 0;
            config.rate = rate;
            config.duration = duration;
            let mode = JobMode::Load(config.pacing());
            run_job(config, opts.dry_run, mode).await
        }
        Commands::Test { opts } => {
            let config = opts.load_config()?;
            let mode = JobMode::Test(config.pacing());
            run_job(config, opts.dry_run, mode).await
        }
        Commands::Send {
            severity,
            source,
            name,
            context,
            opts,
        } => {
            let config = opts.load_config()?;
            let alert = custom_alert_with_context(severity, source, name, context);
            run_job(config, opts.dry_run, JobMode::Single(alert)).await
        }
    }
}

/// Build the publisher and scheduler for `config` and run one job to the end.
async fn run_job(config: GeneratorConfig, dry_run: bool, mode: JobMode) -> anyhow::Result<()> {
    config.validate().context("Invalid configuration")?;

    let sampler =
        AlertSampler::new(&config.sampler_config()).context("Failed to build alert sampler")?;
    let publisher = build_publisher(&config, dry_run).await?;
    let metrics = Arc::new(CounterMetrics::new());

    let cancel = CancellationToken::new();
    setup_shutdown_handler(cancel.clone());

    let scheduler = Scheduler::new(sampler, publisher.clone())
        .with_metrics(metrics.clone())
        .with_reporting(config.reporting());

    let result = scheduler.run(mode, cancel).await;

    if let Err(e) = publisher.close().await {
        warn!(error = %e, "Failed to close publisher cleanly");
    }

    let snapshot = metrics.snapshot();
    info!(
        published = snapshot.published,
        processed = snapshot.processed,
        errors = snapshot.errors,
        mean_latency = ?snapshot.mean_latency(),
        "Publisher metrics"
    );

    if let Some(source) = result.as_ref().err().and_then(|e| e.publish_error()) {
        error!(error = %source, dry_run, "Publisher rejected an alert");
    }

    let report = result.context("Alert job failed")?;
    if report.is_cancelled() {
        warn!(
            sent = report.sent,
            elapsed = ?report.elapsed,
            "Job cancelled"
        );
    } else {
        info!(
            sent = report.sent,
            elapsed = ?report.elapsed,
            rate = %format!("{:.2}", report.rate()),
            "Job completed"
        );
    }

    Ok(())
}

async fn build_publisher(
    config: &GeneratorConfig,
    dry_run: bool,
) -> anyhow::Result<Arc<dyn Publisher>> {
    if dry_run {
        info!("Dry run: alerts will be logged, not published");
        return Ok(Arc::new(LogPublisher::new()));
    }

    let kafka = &config.kafka;
    let publisher = KafkaPublisher::new(&kafka.brokers, &kafka.topic)
        .with_context(|| format!("Failed to create Kafka producer for {}", kafka.brokers))?;

    if kafka.create_topic {
        publisher
            .create_topic(kafka.partitions)
            .await
            .with_context(|| format!("Failed to create topic '{}'", kafka.topic))?;
    }

    info!(brokers = %kafka.brokers, topic = %kafka.topic, "Publishing alerts to Kafka");
    Ok(Arc::new(publisher))
}

/// Cancel `cancel` when Ctrl-C is received.
fn setup_shutdown_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received interrupt signal (Ctrl+C), stopping job");
                cancel.cancel();
            }
            Err(e) => {
                error!(error = %e, "Failed to install Ctrl+C signal handler");
            }
        }
    });
}
