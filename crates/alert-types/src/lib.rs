//! Core types for the alert-loadgen framework.
//!
//! This crate provides the foundational types shared by the generator,
//! publisher and scheduler crates:
//!
//! - [`Alert`] - The synthetic alert record handed to a publisher
//! - [`DistributionTable`] - Weighted candidate values for one alert field
//! - [`WeightedValue`] - A single `(value, weight)` entry of a table
//!
//! # Architecture
//!
//! ```text
//! alert-types (this crate)
//!    │
//!    ├─── alert-generator   (samples Alerts from DistributionTables)
//!    ├─── alert-publisher   (hands Alerts to a broker)
//!    └─── alert-scheduler   (paces generation and publishing)
//! ```
//!
//! # Example
//!
//! ```rust
//! use alert_types::DistributionTable;
//!
//! let table = DistributionTable::parse("HIGH:20, MEDIUM:30, LOW:50").unwrap();
//! assert_eq!(table.len(), 3);
//! assert_eq!(table.total_weight(), 100);
//! ```

pub mod alert;
pub mod distribution;

pub use alert::{
    Alert, BOILERPLATE_NAME, BOILERPLATE_SEVERITY, BOILERPLATE_SOURCE, SCHEMA_VERSION,
    TEST_NAME, TEST_SEVERITY, TEST_SOURCE,
};
pub use distribution::{DistributionError, DistributionTable, WeightedValue, UNKNOWN_VALUE};
pub use uuid::Uuid;
