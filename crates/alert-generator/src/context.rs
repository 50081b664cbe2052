//! Probabilistic context enrichment.
//!
//! Each alert independently gets an `environment` entry with probability
//! [`ENVIRONMENT_PROBABILITY`] and a `region` entry with probability
//! [`REGION_PROBABILITY`]. Values are picked uniformly.

use rand::Rng;
use std::collections::HashMap;

pub const ENVIRONMENT_KEY: &str = "environment";
pub const REGION_KEY: &str = "region";

pub const ENVIRONMENT_PROBABILITY: f64 = 0.3;
pub const REGION_PROBABILITY: f64 = 0.2;

pub const ENVIRONMENTS: [&str; 3] = ["prod", "staging", "dev"];
pub const REGIONS: [&str; 3] = ["us-east-1", "us-west-2", "eu-west-1"];

/// Draw the context map for one alert.
///
/// The environment trial always runs before the region trial so the RNG
/// stream stays stable for a given seed.
pub fn generate_context<R: Rng>(rng: &mut R) -> HashMap<String, String> {
    let mut context = HashMap::new();

    if rng.gen::<f64>() < ENVIRONMENT_PROBABILITY {
        let env = ENVIRONMENTS[rng.gen_range(0..ENVIRONMENTS.len())];
        context.insert(ENVIRONMENT_KEY.to_string(), env.to_string());
    }

    if rng.gen::<f64>() < REGION_PROBABILITY {
        let region = REGIONS[rng.gen_range(0..REGIONS.len())];
        context.insert(REGION_KEY.to_string(), region.to_string());
    }

    context
}
