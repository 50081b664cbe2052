//! Job modes.

use alert_types::Alert;
use std::time::Duration;

/// How load alerts are paced.
#[derive(Debug, Clone, PartialEq)]
pub enum Pacing {
    /// Exactly `count` alerts, unpaced
    Burst { count: u64 },
    /// `rate` alerts per second until `duration` elapses
    Continuous { rate: f64, duration: Duration },
}

impl Pacing {
    /// Pick burst pacing when a positive burst size is configured, otherwise
    /// continuous pacing at `rate` for `duration`.
    pub fn from_burst_size(burst_size: u64, rate: f64, duration: Duration) -> Self {
        if burst_size > 0 {
            Pacing::Burst { count: burst_size }
        } else {
            Pacing::Continuous { rate, duration }
        }
    }

    pub fn is_burst(&self) -> bool {
        matches!(self, Pacing::Burst { .. })
    }
}

/// What a job does, decided once before it starts.
#[derive(Debug, Clone, PartialEq)]
pub enum JobMode {
    /// Sampled alerts only
    Load(Pacing),
    /// Canonical test alert first, then sampled alerts
    Test(Pacing),
    /// Boilerplate canary first, then sampled alerts
    Process(Pacing),
    /// One caller-specified alert
    Single(Alert),
}

impl JobMode {
    pub fn pacing(&self) -> Option<&Pacing> {
        match self {
            JobMode::Load(p) | JobMode::Test(p) | JobMode::Process(p) => Some(p),
            JobMode::Single(_) => None,
        }
    }

    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            JobMode::Load(Pacing::Burst { .. }) => "burst",
            JobMode::Load(Pacing::Continuous { .. }) => "continuous",
            JobMode::Test(_) => "test",
            JobMode::Process(_) => "process",
            JobMode::Single(_) => "single",
        }
    }
}
