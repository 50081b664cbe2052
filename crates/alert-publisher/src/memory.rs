//! In-process publisher that records alerts in order.

use crate::error::PublishError;
use crate::Publisher;
use alert_types::Alert;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Failure injected at a given publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedFailure {
    /// Fail with [`PublishError::Rejected`]
    Reject(String),
    /// Fail with [`PublishError::Cancelled`]
    Cancel,
}

impl ScriptedFailure {
    fn to_error(&self) -> PublishError {
        match self {
            ScriptedFailure::Reject(reason) => PublishError::Rejected(reason.clone()),
            ScriptedFailure::Cancel => PublishError::Cancelled,
        }
    }
}

/// Publisher that keeps every successfully published alert in memory.
///
/// Failures can be scripted per call index (0-based, counting every call,
/// including failed ones) and an artificial per-call delay can be added.
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    alerts: Mutex<Vec<Alert>>,
    calls: AtomicU64,
    failures: HashMap<u64, ScriptedFailure>,
    delay: Option<Duration>,
    closed: AtomicBool,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the publish call with the given index.
    pub fn with_failure_at(mut self, call: u64, failure: ScriptedFailure) -> Self {
        self.failures.insert(call, failure);
        self
    }

    /// Sleep for `delay` inside every publish call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Alerts published so far, in publish order.
    pub async fn alerts(&self) -> Vec<Alert> {
        self.alerts.lock().await.clone()
    }

    /// Number of successfully published alerts.
    pub async fn len(&self) -> usize {
        self.alerts.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.alerts.lock().await.is_empty()
    }

    /// Number of publish calls, successful or not.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Publisher for MemoryPublisher {
    async fn publish(&self, alert: &Alert) -> Result<(), PublishError> {
        if self.is_closed() {
            return Err(PublishError::Closed);
        }

        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(failure) = self.failures.get(&call) {
            return Err(failure.to_error());
        }

        self.alerts.lock().await.push(alert.clone());
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
