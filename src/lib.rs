//! Alert load generator library.
//!
//! Generates synthetic alerts from weighted distributions and publishes them
//! to Kafka at a target rate or as an instantaneous burst, for load-testing
//! and functionally exercising an alert-processing pipeline.
//!
//! # Crates
//!
//! - `alert_types` - the alert record and distribution tables
//! - `alert_generator` - seeded weighted sampling and fixed alerts
//! - `alert_publisher` - the `Publisher` trait with Kafka, dry-run and
//!   in-memory implementations
//! - `alert_scheduler` - burst / continuous / test / process jobs with
//!   cancellation, progress and metrics
//!
//! # CLI Usage
//!
//! ```bash
//! # Boilerplate canary, then load per config
//! alert-loadgen process --config loadgen.yaml
//!
//! # 10k alerts as fast as possible, deterministic
//! alert-loadgen burst --count 10000 --seed 42
//!
//! # 50 alerts/s for five minutes without a broker
//! alert-loadgen continuous --rate 50 --duration 5m --dry-run
//!
//! # One hand-written alert
//! alert-loadgen send --severity HIGH --source db --name deadlock --context region=eu-west-1
//! ```

use anyhow::Context;
use clap::Args;
use std::path::PathBuf;

pub mod config;

pub use config::{ConfigError, GeneratorConfig};

/// Options shared by every subcommand.
#[derive(Args, Clone, Debug, Default)]
pub struct GeneratorOpts {
    /// YAML configuration file
    #[arg(long, value_name = "PATH", env = "ALERT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Severity distribution (format: "HIGH:20,MEDIUM:30,LOW:50")
    #[arg(long)]
    pub severity_dist: Option<String>,

    /// Source distribution (format: "api:40,db:35,cache:25")
    #[arg(long)]
    pub source_dist: Option<String>,

    /// Name distribution (format: "timeout:50,error:50")
    #[arg(long)]
    pub name_dist: Option<String>,

    /// Deterministic seed (0 seeds from the clock)
    #[arg(long, env = "ALERT_SEED")]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub kafka: KafkaOpts,

    /// Dry run mode - log alerts instead of publishing them
    #[arg(long)]
    pub dry_run: bool,
}

/// Kafka connection options.
#[derive(Args, Clone, Debug, Default)]
pub struct KafkaOpts {
    /// Kafka broker addresses
    #[arg(long, env = "KAFKA_BROKERS")]
    pub kafka_brokers: Option<String>,

    /// Topic to publish alerts to
    #[arg(long, env = "ALERT_TOPIC")]
    pub topic: Option<String>,

    /// Create the topic before publishing
    #[arg(long)]
    pub create_topic: bool,
}

impl GeneratorOpts {
    /// Load the config file (or defaults) and apply command-line overrides.
    ///
    /// The result is not validated; callers apply subcommand overrides first.
    pub fn load_config(&self) -> anyhow::Result<GeneratorConfig> {
        let mut config = match &self.config {
            Some(path) => GeneratorConfig::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GeneratorConfig::default(),
        };
        self.apply(&mut config);
        Ok(config)
    }

    /// Overwrite config values with options that were given.
    pub fn apply(&self, config: &mut GeneratorConfig) {
        if let Some(dist) = &self.severity_dist {
            config.severity_distribution = dist.clone();
        }
        if let Some(dist) = &self.source_dist {
            config.source_distribution = dist.clone();
        }
        if let Some(dist) = &self.name_dist {
            config.name_distribution = dist.clone();
        }
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(brokers) = &self.kafka.kafka_brokers {
            config.kafka.brokers = brokers.clone();
        }
        if let Some(topic) = &self.kafka.topic {
            config.kafka.topic = topic.clone();
        }
        if self.kafka.create_topic {
            config.kafka.create_topic = true;
        }
    }
}

/// Parse a `key=value` context entry.
pub fn parse_context_entry(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid context entry '{s}': expected key=value"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("invalid context entry '{s}': empty key"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}
