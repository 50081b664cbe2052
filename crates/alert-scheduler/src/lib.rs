//! Pacing scheduler for the alert-loadgen framework.
//!
//! This crate provides the [`Scheduler`] which drives an
//! [`AlertSampler`](alert_generator::AlertSampler) and a
//! [`Publisher`](alert_publisher::Publisher) according to a [`JobMode`]:
//!
//! - **Burst**: publish exactly N alerts as fast as the publisher accepts them
//! - **Continuous**: publish at a target rate until a duration elapses
//! - **Test**: burst or continuous, with the canonical test alert sent first
//! - **Process**: the boilerplate canary first, then burst or continuous
//! - **Single**: one caller-specified alert
//!
//! # Architecture
//!
//! ```text
//!             JobMode (decided once)
//!                    │
//!                    ▼
//! ┌────────────────────────────────────┐
//! │             Scheduler              │
//! │                                    │
//! │  AlertSampler ──► Publisher ──┐    │
//! │       ▲                       │    │
//! │       │      classify errors ◄┘    │
//! │   tick / loop                      │
//! │       │                            │
//! │       ├──► MetricsRecorder         │
//! │       └──► progress callback       │
//! └─────────────────┬──────────────────┘
//!                   │
//!                   ▼
//!   JobReport { Completed | Cancelled }  or  JobError
//! ```
//!
//! Cancellation is cooperative through a
//! [`CancellationToken`](tokio_util::sync::CancellationToken) that is raced
//! against both the pacing timer and every publish call.
//!
//! # Example
//!
//! ```rust,ignore
//! use alert_generator::{AlertSampler, SamplerConfig};
//! use alert_publisher::MemoryPublisher;
//! use alert_scheduler::{JobMode, Pacing, Scheduler};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! let sampler = AlertSampler::new(&SamplerConfig::new("HIGH:100", "api:100", "error:100"))?;
//! let publisher = Arc::new(MemoryPublisher::new());
//! let report = Scheduler::new(sampler, publisher.clone())
//!     .run(JobMode::Process(Pacing::Burst { count: 5 }), CancellationToken::new())
//!     .await?;
//! assert_eq!(report.sent, 5);
//! ```

pub mod classify;
pub mod error;
pub mod metrics;
pub mod mode;
pub mod progress;
pub mod report;
pub mod scheduler;

// Re-exports for convenience
pub use classify::{classify_publish_error, Disposition};
pub use error::JobError;
pub use metrics::{CounterMetrics, MetricsRecorder, MetricsSnapshot, NoopMetrics};
pub use mode::{JobMode, Pacing};
pub use progress::ProgressFn;
pub use report::{JobReport, JobStatus, ReportingConfig};
pub use scheduler::Scheduler;
