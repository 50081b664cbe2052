//! Dry-run publisher that only logs.

use crate::error::PublishError;
use crate::Publisher;
use alert_types::Alert;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info};

/// Publisher that logs each alert instead of sending it anywhere.
///
/// Useful for validating configuration and pacing without a broker.
#[derive(Debug, Default)]
pub struct LogPublisher {
    published: AtomicU64,
}

impl LogPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alerts "published" so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Publisher for LogPublisher {
    async fn publish(&self, alert: &Alert) -> Result<(), PublishError> {
        let n = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(
            n,
            alert_id = %alert.id,
            severity = %alert.severity,
            source = %alert.source,
            name = %alert.name,
            context = ?alert.context,
            "Dry run: would publish alert"
        );
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        info!("Dry run publisher closed after {} alerts", self.published());
        Ok(())
    }
}
