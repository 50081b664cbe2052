//! Weighted distribution tables.
//!
//! A table is written as `KEY1:PCT1,KEY2:PCT2,...` where every percentage is
//! an integer in `0..=100` and the percentages sum to exactly 100. Whitespace
//! around keys and percentages is trimmed and empty segments left by stray
//! commas are ignored.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Value returned when selecting from an empty table.
pub const UNKNOWN_VALUE: &str = "unknown";

/// Required sum of all weights in a table.
pub const TOTAL_PERCENT: u32 = 100;

/// Errors produced while parsing a distribution string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistributionError {
    /// Segment is not of the form `KEY:PCT`
    #[error("Malformed distribution entry '{0}': expected KEY:PCT")]
    MalformedEntry(String),

    /// Key part of a segment is empty
    #[error("Empty key in distribution entry '{0}'")]
    EmptyKey(String),

    /// Percentage is not an integer
    #[error("Invalid percentage '{value}' for key '{key}'")]
    InvalidPercentage { key: String, value: String },

    /// Percentage is outside `0..=100`
    #[error("Percentage {value} for key '{key}' must be between 0 and 100")]
    PercentageOutOfRange { key: String, value: i64 },

    /// Same key appears twice
    #[error("Duplicate key '{0}' in distribution")]
    DuplicateKey(String),

    /// Percentages do not add up to 100
    #[error("Distribution percentages must sum to 100, got {0}")]
    InvalidTotal(u64),
}

/// One candidate value and its percentage weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightedValue {
    pub value: String,
    pub weight: u32,
}

impl WeightedValue {
    pub fn new(value: impl Into<String>, weight: u32) -> Self {
        Self {
            value: value.into(),
            weight,
        }
    }
}

/// Ordered set of weighted candidate values for one alert field.
///
/// Entry order is the order of the source string and never changes, which
/// keeps selection reproducible under a fixed seed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DistributionTable {
    entries: Vec<WeightedValue>,
}

impl DistributionTable {
    /// Parse and validate a `KEY:PCT,...` string.
    pub fn parse(input: &str) -> Result<Self, DistributionError> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();
        let mut total: u64 = 0;

        for segment in input.split(',') {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }

            let parts: Vec<&str> = segment.split(':').collect();
            if parts.len() != 2 {
                return Err(DistributionError::MalformedEntry(segment.to_string()));
            }

            let key = parts[0].trim();
            let raw = parts[1].trim();
            if key.is_empty() {
                return Err(DistributionError::EmptyKey(segment.to_string()));
            }

            let value: i64 = raw
                .parse()
                .map_err(|_| DistributionError::InvalidPercentage {
                    key: key.to_string(),
                    value: raw.to_string(),
                })?;
            if !(0..=TOTAL_PERCENT as i64).contains(&value) {
                return Err(DistributionError::PercentageOutOfRange {
                    key: key.to_string(),
                    value,
                });
            }

            if !seen.insert(key.to_string()) {
                return Err(DistributionError::DuplicateKey(key.to_string()));
            }

            total += value as u64;
            entries.push(WeightedValue::new(key, value as u32));
        }

        if total != TOTAL_PERCENT as u64 {
            return Err(DistributionError::InvalidTotal(total));
        }

        Ok(Self { entries })
    }

    /// Build a table from entries without validating the total.
    ///
    /// Selection still works on such tables because it sums the actual
    /// weights; use [`DistributionTable::validate`] to enforce the 100 rule.
    pub fn from_entries(entries: Vec<WeightedValue>) -> Self {
        Self { entries }
    }

    /// Check that the weights sum to exactly 100.
    pub fn validate(&self) -> Result<(), DistributionError> {
        let total = self.total_weight();
        if total != TOTAL_PERCENT as u64 {
            return Err(DistributionError::InvalidTotal(total));
        }
        Ok(())
    }

    /// Sum of the actual weights.
    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|e| e.weight as u64).sum()
    }

    /// Select the entry for a draw `r` in `[0, total_weight())`.
    ///
    /// Walks the entries accumulating weights and returns the first one whose
    /// cumulative weight exceeds `r`. Returns [`UNKNOWN_VALUE`] when nothing
    /// matches, which only happens for empty or all-zero tables.
    pub fn select(&self, r: u64) -> &str {
        let mut cumulative: u64 = 0;
        for entry in &self.entries {
            cumulative += entry.weight as u64;
            if r < cumulative {
                return &entry.value;
            }
        }
        UNKNOWN_VALUE
    }

    pub fn entries(&self) -> &[WeightedValue] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromStr for DistributionTable {
    type Err = DistributionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DistributionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .entries
            .iter()
            .map(|e| format!("{}:{}", e.value, e.weight))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}
