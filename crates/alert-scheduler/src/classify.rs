//! Publish failure classification.
//!
//! A failed publish is either a clean stop requested by the caller or an
//! operational failure. Callers treat the first as expected and the second
//! as something to alarm on, so the two must never be conflated.

use alert_publisher::PublishError;
use tokio_util::sync::CancellationToken;

/// What a failed publish means for the running job.
#[derive(Debug)]
pub enum Disposition {
    /// The caller cancelled the job; stop cleanly
    Cancelled,
    /// The publisher failed for another reason; abort the job
    Failed(PublishError),
}

/// Classify a publish error.
///
/// The failure counts as a cancellation when the token was already cancelled
/// when the error surfaced, or when the error itself reports a cancelled
/// operation. Everything else is a real failure.
pub fn classify_publish_error(err: PublishError, cancel: &CancellationToken) -> Disposition {
    if cancel.is_cancelled() || err.is_cancellation() {
        Disposition::Cancelled
    } else {
        Disposition::Failed(err)
    }
}
