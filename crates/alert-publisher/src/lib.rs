//! Alert publishers for the alert-loadgen framework.
//!
//! A [`Publisher`] takes a finished [`Alert`](alert_types::Alert) and hands it
//! to a broker. The scheduler only ever talks to the trait, so any of the
//! implementations here (or a caller's own) can be plugged in.
//!
//! # Architecture
//!
//! ```text
//!   Scheduler
//!       │  publish(&Alert)
//!       ▼
//! ┌──────────────────┐
//! │  dyn Publisher   │
//! └──┬───────┬────┬──┘
//!    │       │    │
//!    ▼       ▼    ▼
//!  Kafka    Log  Memory
//!  topic  (dry  (tests)
//!          run)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use alert_publisher::{KafkaPublisher, Publisher};
//! use alert_types::Alert;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let publisher = KafkaPublisher::new("localhost:9092", "alerts")?;
//!     publisher.create_topic(3).await?;
//!     publisher.publish(&Alert::boilerplate()).await?;
//!     publisher.close().await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod kafka;
pub mod dry_run;
pub mod memory;

use alert_types::Alert;
use async_trait::async_trait;

// Re-exports for convenience
pub use error::PublishError;
pub use kafka::{KafkaPublisher, DEFAULT_PARTITIONS};
pub use dry_run::LogPublisher;
pub use memory::{MemoryPublisher, ScriptedFailure};

/// Sink that hands finished alerts to a broker.
///
/// Implementations must be safe to call repeatedly and from concurrently
/// running jobs. Cancellation-style failures should be reported as
/// [`PublishError::Cancelled`] so callers can tell them apart from real
/// delivery failures.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish one alert.
    async fn publish(&self, alert: &Alert) -> Result<(), PublishError>;

    /// Release resources. Called by the publisher's owner, never by a job.
    async fn close(&self) -> Result<(), PublishError>;
}
