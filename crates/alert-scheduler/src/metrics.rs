//! Metrics recording for scheduled jobs.
//!
//! The scheduler always calls through [`MetricsRecorder`]; pass
//! [`NoopMetrics`] when nothing should be recorded.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Sink for job metrics.
///
/// Calls are fire-and-forget: implementations must not block and cannot
/// fail the job.
pub trait MetricsRecorder: Send + Sync {
    /// A publish failed for a reason other than cancellation.
    fn record_error(&self);

    /// An alert was generated and published; `latency` covers the publish call.
    fn record_processed(&self, latency: Duration);

    /// An alert was accepted by the publisher.
    fn record_published(&self);
}

/// Recorder that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsRecorder for NoopMetrics {
    fn record_error(&self) {}

    fn record_processed(&self, _latency: Duration) {}

    fn record_published(&self) {}
}

/// In-process atomic counters.
#[derive(Debug, Default)]
pub struct CounterMetrics {
    published: AtomicU64,
    processed: AtomicU64,
    errors: AtomicU64,
    latency_micros: AtomicU64,
}

/// Point-in-time copy of [`CounterMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub published: u64,
    pub processed: u64,
    pub errors: u64,
    /// Sum of all processed latencies
    pub total_latency: Duration,
}

impl MetricsSnapshot {
    /// Mean publish latency, zero when nothing was processed.
    pub fn mean_latency(&self) -> Duration {
        if self.processed == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(self.total_latency.as_secs_f64() / self.processed as f64)
        }
    }
}

impl CounterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            published: self.published.load(Ordering::Relaxed),
            processed: self.processed.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            total_latency: Duration::from_micros(self.latency_micros.load(Ordering::Relaxed)),
        }
    }
}

impl MetricsRecorder for CounterMetrics {
    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    fn record_processed(&self, latency: Duration) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        let micros = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_micros.fetch_add(micros, Ordering::Relaxed);
    }

    fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_metrics() {
        let metrics = CounterMetrics::new();
        metrics.record_published();
        metrics.record_published();
        metrics.record_processed(Duration::from_millis(2));
        metrics.record_processed(Duration::from_millis(4));
        metrics.record_error();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.published, 2);
        assert_eq!(snapshot.processed, 2);
        assert_eq!(snapshot.errors, 1);
        assert_eq!(snapshot.total_latency, Duration::from_millis(6));
        assert!((snapshot.mean_latency().as_secs_f64() - 0.003).abs() < 1e-6);
    }

    #[test]
    fn test_mean_latency_empty() {
        assert_eq!(MetricsSnapshot::default().mean_latency(), Duration::ZERO);
    }

    #[test]
    fn test_noop_is_object_safe() {
        let recorder: &dyn MetricsRecorder = &NoopMetrics;
        recorder.record_published();
        recorder.record_processed(Duration::from_millis(1));
        recorder.record_error();
    }
}
