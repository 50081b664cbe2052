//! Error types for alert publishers.

use rdkafka::error::KafkaError;
use thiserror::Error;

/// Errors that can occur while publishing an alert.
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Publish cancelled")]
    Cancelled,

    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Topic creation error: {0}")]
    TopicCreation(String),

    #[error("Publisher is closed")]
    Closed,

    #[error("Alert rejected: {0}")]
    Rejected(String),
}

impl PublishError {
    /// Whether this error reports a cancelled operation rather than a
    /// delivery failure.
    pub fn is_cancellation(&self) -> bool {
        matches!(
            self,
            PublishError::Cancelled | PublishError::Kafka(KafkaError::Canceled)
        )
    }
}
