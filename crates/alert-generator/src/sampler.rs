//! Weighted alert sampler.

use crate::context::generate_context;
use crate::seed::{is_deterministic, resolve_seed};
use alert_types::{Alert, DistributionError, DistributionTable, UNKNOWN_VALUE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Error type for sampler construction.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// A distribution string failed to parse
    #[error("Invalid {field} distribution: {source}")]
    InvalidDistribution {
        field: &'static str,
        #[source]
        source: DistributionError,
    },
}

/// Distribution strings and seed used to build an [`AlertSampler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Severity distribution, e.g. `HIGH:20,MEDIUM:30,LOW:50`
    pub severity_distribution: String,
    /// Source distribution, e.g. `api:40,db:35,cache:25`
    pub source_distribution: String,
    /// Name distribution, e.g. `timeout:50,error:50`
    pub name_distribution: String,
    /// Deterministic seed; `None` or `0` seeds from the wall clock
    pub seed: Option<u64>,
}

impl SamplerConfig {
    pub fn new(
        severity_distribution: impl Into<String>,
        source_distribution: impl Into<String>,
        name_distribution: impl Into<String>,
    ) -> Self {
        Self {
            severity_distribution: severity_distribution.into(),
            source_distribution: source_distribution.into(),
            name_distribution: name_distribution.into(),
            seed: None,
        }
    }

    /// Set a deterministic seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Sampler that produces alerts with weighted random fields.
///
/// Each sampler owns its own [`StdRng`]; two samplers built from the same
/// tables and the same non-zero seed produce the same field sequence. Ids and
/// timestamps are not drawn from the seeded stream.
pub struct AlertSampler {
    severity: DistributionTable,
    source: DistributionTable,
    name: DistributionTable,
    /// Seed the RNG was built from
    seed: u64,
    rng: StdRng,
    /// Number of alerts sampled so far
    drawn: u64,
}

impl AlertSampler {
    /// Parse the configured distributions and build a sampler.
    ///
    /// Fails if any distribution string is invalid; a sampler never runs with
    /// a malformed table.
    pub fn new(config: &SamplerConfig) -> Result<Self, GeneratorError> {
        let severity = parse_field("severity", &config.severity_distribution)?;
        let source = parse_field("source", &config.source_distribution)?;
        let name = parse_field("name", &config.name_distribution)?;

        Ok(Self::from_tables(severity, source, name, config.seed))
    }

    /// Build a sampler from already-parsed tables.
    pub fn from_tables(
        severity: DistributionTable,
        source: DistributionTable,
        name: DistributionTable,
        seed: Option<u64>,
    ) -> Self {
        let deterministic = is_deterministic(seed);
        let seed = resolve_seed(seed);
        if deterministic {
            debug!(seed, "Creating alert sampler");
        } else {
            info!(seed, "No seed given; seeding alert sampler from the clock");
        }

        Self {
            severity,
            source,
            name,
            seed,
            rng: StdRng::seed_from_u64(seed),
            drawn: 0,
        }
    }

    /// Sample the next alert.
    ///
    /// Draw order is severity, source, name, then context.
    pub fn next_alert(&mut self) -> Alert {
        let severity = select_weighted(&self.severity, &mut self.rng).to_string();
        let source = select_weighted(&self.source, &mut self.rng).to_string();
        let name = select_weighted(&self.name, &mut self.rng).to_string();
        let context = generate_context(&mut self.rng);

        self.drawn += 1;

        Alert::new(severity, source, name, context)
    }

    /// Sample `count` alerts lazily.
    pub fn alerts(&mut self, count: u64) -> AlertIterator<'_> {
        AlertIterator {
            sampler: self,
            remaining: count,
        }
    }

    /// The resolved seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Number of alerts sampled so far.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }

    pub fn severity_table(&self) -> &DistributionTable {
        &self.severity
    }

    pub fn source_table(&self) -> &DistributionTable {
        &self.source
    }

    pub fn name_table(&self) -> &DistributionTable {
        &self.name
    }
}

/// Pick a value from `table` using one draw from `rng`.
///
/// Draws `r` uniformly from `[0, total)` where `total` is the sum of the
/// actual weights, then walks the table in order. Empty or all-zero tables
/// yield [`UNKNOWN_VALUE`] without consuming randomness.
pub fn select_weighted<'a, R: Rng>(table: &'a DistributionTable, rng: &mut R) -> &'a str {
    let total = table.total_weight();
    if total == 0 {
        return UNKNOWN_VALUE;
    }
    let r = rng.gen_range(0..total);
    table.select(r)
}

fn parse_field(field: &'static str, input: &str) -> Result<DistributionTable, GeneratorError> {
    DistributionTable::parse(input)
        .map_err(|source| GeneratorError::InvalidDistribution { field, source })
}

/// Iterator that lazily samples alerts.
pub struct AlertIterator<'a> {
    sampler: &'a mut AlertSampler,
    remaining: u64,
}

impl Iterator for AlertIterator<'_> {
    type Item = Alert;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        self.remaining -= 1;
        Some(self.sampler.next_alert())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for AlertIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use alert_types::WeightedValue;

    fn test_config() -> SamplerConfig {
        SamplerConfig::new(
            "HIGH:20,MEDIUM:30,LOW:50",
            "api:40,db:35,cache:25",
            "timeout:40,error:40,slow_query:20",
        )
        .with_seed(42)
    }

    #[test]
    fn test_single_valued_tables() {
        let config = SamplerConfig::new("HIGH:100", "api:100", "error:100").with_seed(42);
        let mut sampler = AlertSampler::new(&config).unwrap();

        for alert in sampler.alerts(20) {
            assert!(alert.matches("HIGH", "api", "error"));
        }
        assert_eq!(sampler.drawn(), 20);
    }

    #[test]
    fn test_deterministic_generation() {
        let mut s1 = AlertSampler::new(&test_config()).unwrap();
        let mut s2 = AlertSampler::new(&test_config()).unwrap();

        for _ in 0..500 {
            let a = s1.next_alert();
            let b = s2.next_alert();
            assert_eq!(a.severity, b.severity);
            assert_eq!(a.source, b.source);
            assert_eq!(a.name, b.name);
            assert_eq!(a.context, b.context);
            assert_ne!(a.id, b.id);
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut s1 = AlertSampler::new(&test_config()).unwrap();
        let mut s2 = AlertSampler::new(&test_config().with_seed(7)).unwrap();

        let a: Vec<_> = s1.alerts(50).map(|a| (a.severity, a.source, a.name)).collect();
        let b: Vec<_> = s2.alerts(50).map(|a| (a.severity, a.source, a.name)).collect();
        assert_ne!(a, b);
    }

    #[test]
    fn test_weighted_fairness() {
        let config = SamplerConfig::new("A:90,B:10", "api:100", "error:100").with_seed(1234);
        let mut sampler = AlertSampler::new(&config).unwrap();

        let draws = 100_000;
        let a_count = sampler.alerts(draws).filter(|a| a.severity == "A").count();
        let ratio = a_count as f64 / draws as f64;

        assert!((ratio - 0.9).abs() < 0.01, "ratio was {ratio}");
    }

    #[test]
    fn test_select_weighted_empty_table() {
        let mut rng = StdRng::seed_from_u64(42);
        let table = DistributionTable::default();
        assert_eq!(select_weighted(&table, &mut rng), UNKNOWN_VALUE);
    }

    #[test]
    fn test_empty_table_yields_unknown() {
        let mut sampler = AlertSampler::from_tables(
            DistributionTable::default(),
            DistributionTable::parse("api:100").unwrap(),
            DistributionTable::parse("error:100").unwrap(),
            Some(42),
        );

        let alert = sampler.next_alert();
        assert_eq!(alert.severity, UNKNOWN_VALUE);
        assert_eq!(alert.source, "api");
    }

    #[test]
    fn test_unvalidated_table_is_tolerated() {
        let severity = DistributionTable::from_entries(vec![
            WeightedValue::new("HIGH", 3),
            WeightedValue::new("LOW", 1),
        ]);
        let mut sampler = AlertSampler::from_tables(
            severity,
            DistributionTable::parse("api:100").unwrap(),
            DistributionTable::parse("error:100").unwrap(),
            Some(42),
        );

        for alert in sampler.alerts(100) {
            assert!(alert.severity == "HIGH" || alert.severity == "LOW");
        }
    }

    #[test]
    fn test_invalid_distribution_fails_construction() {
        let config = SamplerConfig::new("HIGH:50,LOW:40", "api:100", "error:100");
        let result = AlertSampler::new(&config);

        assert!(matches!(
            result,
            Err(GeneratorError::InvalidDistribution {
                field: "severity",
                source: DistributionError::InvalidTotal(90),
            })
        ));

        let config = SamplerConfig::new("HIGH:100", "api:100", "error:50:1,x:50");
        assert!(matches!(
            AlertSampler::new(&config),
            Err(GeneratorError::InvalidDistribution { field: "name", .. })
        ));
    }

    #[test]
    fn test_seed_is_recorded() {
        let sampler = AlertSampler::new(&test_config()).unwrap();
        assert_eq!(sampler.seed(), 42);

        let unseeded = AlertSampler::new(&SamplerConfig::new("A:100", "B:100", "C:100")).unwrap();
        assert_ne!(unseeded.seed(), 0);
    }

    #[test]
    fn test_alert_iterator_size_hint() {
        let mut sampler = AlertSampler::new(&test_config()).unwrap();
        let iter = sampler.alerts(5);
        assert_eq!(iter.len(), 5);
        assert_eq!(iter.count(), 5);
    }
}
