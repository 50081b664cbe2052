//! Error types for scheduled jobs.

use alert_publisher::PublishError;
use alert_types::Uuid;
use thiserror::Error;

/// Errors that abort a job.
///
/// Cancellation is not an error; it is reported through
/// [`JobStatus::Cancelled`](crate::JobStatus::Cancelled).
#[derive(Error, Debug)]
pub enum JobError {
    /// The publisher rejected a load alert
    #[error("Failed to publish alert {alert_id} at index {index}: {source}")]
    Publish {
        index: u64,
        alert_id: Uuid,
        #[source]
        source: PublishError,
    },

    /// The boilerplate canary could not be published, so no load was sent
    #[error("Failed to publish boilerplate alert {alert_id}: {source}")]
    Boilerplate {
        alert_id: Uuid,
        #[source]
        source: PublishError,
    },

    /// Continuous pacing needs a finite rate above zero
    #[error("Invalid target rate {0}: must be a finite number greater than 0")]
    InvalidRate(f64),
}

impl JobError {
    /// The underlying publisher error, if any.
    pub fn publish_error(&self) -> Option<&PublishError> {
        match self {
            JobError::Publish { source, .. } | JobError::Boilerplate { source, .. } => {
                Some(source)
            }
            JobError::InvalidRate(_) => None,
        }
    }
}
