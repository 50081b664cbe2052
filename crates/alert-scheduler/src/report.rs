//! Job results and periodic reporting settings.

use std::time::Duration;

/// Default number of burst alerts between throughput log lines.
pub const DEFAULT_BURST_LOG_EVERY: u64 = 100;

/// Default wall-clock interval between continuous progress log lines.
pub const DEFAULT_CONTINUOUS_LOG_EVERY: Duration = Duration::from_secs(5);

/// How a job ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Completed,
    Cancelled,
}

/// Summary of a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct JobReport {
    pub status: JobStatus,
    /// Alerts successfully published by the job's main loop
    pub sent: u64,
    /// Wall-clock time from job start to stop
    pub elapsed: Duration,
    /// Requested rate for continuous jobs
    pub target_rate: Option<f64>,
}

impl JobReport {
    pub fn completed(sent: u64, elapsed: Duration) -> Self {
        Self {
            status: JobStatus::Completed,
            sent,
            elapsed,
            target_rate: None,
        }
    }

    pub fn cancelled(sent: u64, elapsed: Duration) -> Self {
        Self {
            status: JobStatus::Cancelled,
            sent,
            elapsed,
            target_rate: None,
        }
    }

    pub fn with_target_rate(mut self, rate: f64) -> Self {
        self.target_rate = Some(rate);
        self
    }

    pub fn is_completed(&self) -> bool {
        self.status == JobStatus::Completed
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == JobStatus::Cancelled
    }

    /// Achieved alerts per second.
    pub fn rate(&self) -> f64 {
        achieved_rate(self.sent, self.elapsed)
    }
}

/// Alerts per second, zero when no time has elapsed.
pub fn achieved_rate(sent: u64, elapsed: Duration) -> f64 {
    if elapsed.as_secs_f64() > 0.0 {
        sent as f64 / elapsed.as_secs_f64()
    } else {
        0.0
    }
}

/// Intervals for the periodic progress log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingConfig {
    /// Burst: log throughput every this many alerts (0 disables)
    pub burst_log_every: u64,
    /// Continuous: log target vs actual rate at this wall-clock interval
    pub continuous_log_every: Duration,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            burst_log_every: DEFAULT_BURST_LOG_EVERY,
            continuous_log_every: DEFAULT_CONTINUOUS_LOG_EVERY,
        }
    }
}
