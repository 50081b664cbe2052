//! Alert sampler for the alert-loadgen framework.
//!
//! This crate provides the [`AlertSampler`] which draws alert fields from
//! weighted distribution tables. The sampler owns a single [`StdRng`] seeded
//! either from a caller-supplied seed (reproducible across runs) or from the
//! wall clock.
//!
//! # Architecture
//!
//! ```text
//!  severity / source / name distribution strings
//!        │
//!        ▼
//! ┌─────────────────┐
//! │  AlertSampler   │
//! │                 │
//! │  - seed         │
//! │  - rng (StdRng) │
//! │  - 3 tables     │
//! └────────┬────────┘
//!          │
//!          ▼
//!    Alert { id, severity, source, name, context }
//! ```
//!
//! # Example
//!
//! ```rust
//! use alert_generator::{AlertSampler, SamplerConfig};
//!
//! let config = SamplerConfig::new("HIGH:100", "api:100", "error:100").with_seed(42);
//! let mut sampler = AlertSampler::new(&config).unwrap();
//! let alert = sampler.next_alert();
//! assert_eq!(alert.severity, "HIGH");
//! ```
//!
//! [`StdRng`]: rand::rngs::StdRng

pub mod context;
pub mod fixed;
pub mod sampler;
pub mod seed;

// Re-exports for convenience
pub use fixed::{boilerplate_alert, custom_alert, custom_alert_with_context, test_alert};
pub use sampler::{AlertSampler, GeneratorError, SamplerConfig};
pub use seed::resolve_seed;
