//! Kafka alert publisher.
//!
//! Each alert is encoded as a JSON document and sent to a single topic keyed
//! by the alert id.

use crate::error::PublishError;
use crate::Publisher;
use alert_types::Alert;
use async_trait::async_trait;
use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::error::KafkaError;
use rdkafka::producer::{FutureProducer, FutureRecord, Producer};
use rdkafka::ClientConfig;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info};

/// Default number of partitions for created topics.
pub const DEFAULT_PARTITIONS: i32 = 3;

/// How long `send` may wait for room in the local producer queue.
const QUEUE_TIMEOUT: Duration = Duration::from_secs(30);

/// How long `close` waits for in-flight messages.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// Publisher that sends alerts to a Kafka topic.
pub struct KafkaPublisher {
    producer: FutureProducer,
    brokers: String,
    topic: String,
    closed: AtomicBool,
}

impl KafkaPublisher {
    /// Create a new Kafka publisher.
    ///
    /// # Arguments
    ///
    /// * `brokers` - Kafka broker addresses (e.g., "localhost:9092")
    /// * `topic` - Topic every alert is published to
    pub fn new(brokers: &str, topic: &str) -> Result<Self, PublishError> {
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", brokers)
            .set("message.timeout.ms", "30000")
            .set("queue.buffering.max.messages", "100000")
            .set("queue.buffering.max.kbytes", "1048576")
            .set("batch.size", "65536")
            .set("linger.ms", "5")
            .create()
            .map_err(PublishError::Kafka)?;

        Ok(Self {
            producer,
            brokers: brokers.to_string(),
            topic: topic.to_string(),
            closed: AtomicBool::new(false),
        })
    }

    /// Topic alerts are published to.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Create the topic if it doesn't exist.
    pub async fn create_topic(&self, partitions: i32) -> Result<(), PublishError> {
        let admin_client: AdminClient<DefaultClientContext> = ClientConfig::new()
            .set("bootstrap.servers", &self.brokers)
            .create()
            .map_err(PublishError::Kafka)?;

        let new_topic = NewTopic::new(&self.topic, partitions, TopicReplication::Fixed(1));
        let opts = AdminOptions::new().operation_timeout(Some(Duration::from_secs(10)));

        let results = admin_client
            .create_topics(&[new_topic], &opts)
            .await
            .map_err(|e| PublishError::TopicCreation(format!("Failed to create topic: {e}")))?;

        for result in results {
            match result {
                Ok(topic_name) => {
                    info!("Topic '{}' created successfully", topic_name);
                }
                Err((topic_name, err)) => {
                    let err_str = err.to_string();
                    if err_str.contains("already exists")
                        || err_str.contains("TopicExistsException")
                    {
                        info!("Topic '{}' already exists", topic_name);
                    } else {
                        return Err(PublishError::TopicCreation(format!(
                            "Failed to create topic {topic_name}: {err}"
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Publisher for KafkaPublisher {
    async fn publish(&self, alert: &Alert) -> Result<(), PublishError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PublishError::Closed);
        }

        let payload = alert.to_json()?;
        let key = alert.id.to_string();
        let record = FutureRecord::to(&self.topic).key(&key).payload(&payload);

        self.producer
            .send(record, QUEUE_TIMEOUT)
            .await
            .map_err(|(err, _)| match err {
                KafkaError::Canceled => PublishError::Cancelled,
                other => PublishError::Kafka(other),
            })?;

        debug!(alert_id = %alert.id, topic = %self.topic, "Published alert");
        Ok(())
    }

    async fn close(&self) -> Result<(), PublishError> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }

        info!("Flushing Kafka producer for topic '{}'", self.topic);
        self.producer.flush(FLUSH_TIMEOUT)?;
        Ok(())
    }
}
