//! Generator configuration.
//!
//! Configuration is read from a YAML file and then overridden by command-line
//! options. Every field has a default, so an empty file (or no file at all)
//! is a valid configuration.
//!
//! ```yaml
//! severity_distribution: "HIGH:20,MEDIUM:30,LOW:50"
//! source_distribution: "api:40,db:35,cache:25"
//! name_distribution: "timeout:40,error:40,slow_query:20"
//! rate: 50.0
//! duration: 5m
//! burst_size: 0
//! seed: 42
//! reporting:
//!   burst_log_every: 100
//!   continuous_log_every: 5s
//! kafka:
//!   brokers: localhost:9092
//!   topic: alerts
//!   create_topic: true
//!   partitions: 3
//! ```

pub mod duration;

pub use duration::parse_duration;

use alert_generator::SamplerConfig;
use alert_publisher::DEFAULT_PARTITIONS;
use alert_scheduler::{Pacing, ReportingConfig};
use alert_types::{DistributionError, DistributionTable};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_SEVERITY_DISTRIBUTION: &str = "HIGH:20,MEDIUM:30,LOW:50";
pub const DEFAULT_SOURCE_DISTRIBUTION: &str = "api:40,db:35,cache:25";
pub const DEFAULT_NAME_DISTRIBUTION: &str = "timeout:40,error:40,slow_query:20";
pub const DEFAULT_RATE: f64 = 10.0;
pub const DEFAULT_DURATION: Duration = Duration::from_secs(60);
pub const DEFAULT_BROKERS: &str = "localhost:9092";
pub const DEFAULT_TOPIC: &str = "alerts";

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error reading config file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid duration '{input}': {reason}")]
    InvalidDuration { input: String, reason: String },

    #[error("Invalid {field} distribution: {source}")]
    InvalidDistribution {
        field: &'static str,
        #[source]
        source: DistributionError,
    },

    /// Continuous pacing needs a finite rate above zero
    #[error("Rate must be a positive number of alerts per second, got {0}")]
    InvalidRate(f64),

    #[error("Duration must be greater than zero for continuous pacing")]
    ZeroDuration,

    #[error("Invalid reporting configuration: {0}")]
    InvalidReporting(String),

    #[error("Kafka topic needs at least one partition, got {0}")]
    InvalidPartitions(i32),
}

/// Top-level generator configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub severity_distribution: String,
    pub source_distribution: String,
    pub name_distribution: String,
    /// Target alerts per second for continuous pacing
    pub rate: f64,
    /// How long continuous pacing runs
    #[serde(with = "duration::serde_duration")]
    pub duration: Duration,
    /// Positive values select burst pacing
    pub burst_size: u64,
    /// `None` or `0` seeds from the wall clock
    pub seed: Option<u64>,
    pub reporting: ReportingSection,
    pub kafka: KafkaSection,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            severity_distribution: DEFAULT_SEVERITY_DISTRIBUTION.to_string(),
            source_distribution: DEFAULT_SOURCE_DISTRIBUTION.to_string(),
            name_distribution: DEFAULT_NAME_DISTRIBUTION.to_string(),
            rate: DEFAULT_RATE,
            duration: DEFAULT_DURATION,
            burst_size: 0,
            seed: None,
            reporting: ReportingSection::default(),
            kafka: KafkaSection::default(),
        }
    }
}

/// Progress log intervals.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportingSection {
    /// Burst pacing logs throughput every this many alerts (0 disables)
    pub burst_log_every: u64,
    #[serde(with = "duration::serde_duration")]
    pub continuous_log_every: Duration,
}

impl Default for ReportingSection {
    fn default() -> Self {
        let defaults = ReportingConfig::default();
        Self {
            burst_log_every: defaults.burst_log_every,
            continuous_log_every: defaults.continuous_log_every,
        }
    }
}

/// Kafka connection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KafkaSection {
    pub brokers: String,
    pub topic: String,
    /// Create the topic before publishing
    pub create_topic: bool,
    pub partitions: i32,
}

impl Default for KafkaSection {
    fn default() -> Self {
        Self {
            brokers: DEFAULT_BROKERS.to_string(),
            topic: DEFAULT_TOPIC.to_string(),
            create_topic: false,
            partitions: DEFAULT_PARTITIONS,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: GeneratorConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Check the configuration before a job is built from it.
    ///
    /// Rate and duration are only checked when continuous pacing is
    /// selected, i.e. when `burst_size` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_distribution("severity", &self.severity_distribution)?;
        check_distribution("source", &self.source_distribution)?;
        check_distribution("name", &self.name_distribution)?;

        if !self.pacing().is_burst() {
            // The tick interval 1/rate must also fit in a Duration
            if !self.rate.is_finite()
                || self.rate <= 0.0
                || Duration::try_from_secs_f64(1.0 / self.rate).is_err()
            {
                return Err(ConfigError::InvalidRate(self.rate));
            }
            if self.duration.is_zero() {
                return Err(ConfigError::ZeroDuration);
            }
        }

        if self.reporting.continuous_log_every.is_zero() {
            return Err(ConfigError::InvalidReporting(
                "continuous_log_every must be greater than zero".to_string(),
            ));
        }

        if self.kafka.create_topic && self.kafka.partitions < 1 {
            return Err(ConfigError::InvalidPartitions(self.kafka.partitions));
        }

        Ok(())
    }

    pub fn sampler_config(&self) -> SamplerConfig {
        let config = SamplerConfig::new(
            self.severity_distribution.as_str(),
            self.source_distribution.as_str(),
            self.name_distribution.as_str(),
        );
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    /// Burst pacing when `burst_size` is positive, continuous otherwise.
    pub fn pacing(&self) -> Pacing {
        Pacing::from_burst_size(self.burst_size, self.rate, self.duration)
    }

    pub fn reporting(&self) -> ReportingConfig {
        ReportingConfig {
            burst_log_every: self.reporting.burst_log_every,
            continuous_log_every: self.reporting.continuous_log_every,
        }
    }
}

fn check_distribution(field: &'static str, input: &str) -> Result<(), ConfigError> {
    DistributionTable::parse(input)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidDistribution { field, source })
}
