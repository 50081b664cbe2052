//! Seed resolution for the sampler's random source.

use std::time::{SystemTime, UNIX_EPOCH};

/// Resolve the seed the sampler will use.
///
/// A non-zero seed is used as-is so runs are reproducible. `None` or `0`
/// selects a seed derived from the wall clock, so every run differs.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
    match seed {
        Some(seed) if seed != 0 => seed,
        _ => time_seed(),
    }
}

/// Whether the given seed request yields a reproducible sequence.
pub fn is_deterministic(seed: Option<u64>) -> bool {
    matches!(seed, Some(seed) if seed != 0)
}

fn time_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    // Fold the 128-bit nanosecond count so the high bits still contribute
    (nanos as u64) ^ ((nanos >> 64) as u64)
}
