//! The synthetic alert record.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Producer contract version stamped on every alert.
pub const SCHEMA_VERSION: u32 = 1;

/// Severity of the boilerplate canary alert.
pub const BOILERPLATE_SEVERITY: &str = "HIGH";
/// Source of the boilerplate canary alert.
pub const BOILERPLATE_SOURCE: &str = "api";
/// Name of the boilerplate canary alert.
pub const BOILERPLATE_NAME: &str = "timeout";

/// Severity of the canonical test alert.
pub const TEST_SEVERITY: &str = "LOW";
/// Source of the canonical test alert.
pub const TEST_SOURCE: &str = "test-source";
/// Name of the canonical test alert.
pub const TEST_NAME: &str = "test-name";

/// One synthetic alert record.
///
/// Serialized as camelCase JSON. `context` is always present, even when
/// empty, so downstream consumers see a uniform shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique identifier, fresh per alert
    pub id: Uuid,
    /// Producer contract version
    pub schema_version: u32,
    /// Generation time in seconds since the Unix epoch
    pub event_timestamp: i64,
    pub severity: String,
    pub source: String,
    pub name: String,
    /// Optional enrichment fields
    #[serde(default)]
    pub context: HashMap<String, String>,
}

impl Alert {
    /// Create an alert stamped with a fresh id and the current time.
    pub fn new(
        severity: impl Into<String>,
        source: impl Into<String>,
        name: impl Into<String>,
        context: HashMap<String, String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            schema_version: SCHEMA_VERSION,
            event_timestamp: chrono::Utc::now().timestamp(),
            severity: severity.into(),
            source: source.into(),
            name: name.into(),
            context,
        }
    }

    /// The fixed canary alert sent before a full process run.
    pub fn boilerplate() -> Self {
        Self::new(
            BOILERPLATE_SEVERITY,
            BOILERPLATE_SOURCE,
            BOILERPLATE_NAME,
            HashMap::new(),
        )
    }

    /// The canonical alert sent first in test mode.
    pub fn test() -> Self {
        Self::new(TEST_SEVERITY, TEST_SOURCE, TEST_NAME, HashMap::new())
    }

    /// Whether this alert carries the boilerplate severity/source/name.
    pub fn is_boilerplate(&self) -> bool {
        self.matches(BOILERPLATE_SEVERITY, BOILERPLATE_SOURCE, BOILERPLATE_NAME)
    }

    /// Whether this alert carries the canonical test severity/source/name.
    pub fn is_test(&self) -> bool {
        self.matches(TEST_SEVERITY, TEST_SOURCE, TEST_NAME)
    }

    /// Compare the severity/source/name triple.
    pub fn matches(&self, severity: &str, source: &str, name: &str) -> bool {
        self.severity == severity && self.source == source && self.name == name
    }

    /// Serialize to the JSON payload handed to the broker.
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl std::fmt::Display for Alert {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{} ({})",
            self.severity, self.source, self.name, self.id
        )
    }
}
