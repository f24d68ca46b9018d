use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::health::anomaly::DEFAULT_MIN_DETECTOR_SAMPLES;
use crate::projection::{MonteCarloConfig, DEFAULT_HORIZON_MONTHS, DEFAULT_SEED, DEFAULT_TRIALS};

/// Tunable knobs for the analysis core. JSON-loadable; every field has a
/// default so partial files work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub horizon_months: usize,
    pub monte_carlo_trials: usize,
    pub monte_carlo_seed: u64,
    pub anomaly_min_detector_samples: usize,
    pub response_cache_ttl_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            horizon_months: DEFAULT_HORIZON_MONTHS,
            monte_carlo_trials: DEFAULT_TRIALS,
            monte_carlo_seed: DEFAULT_SEED,
            anomaly_min_detector_samples: DEFAULT_MIN_DETECTOR_SAMPLES,
            response_cache_ttl_secs: 30 * 60,
        }
    }
}

impl CoreConfig {
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn monte_carlo(&self) -> MonteCarloConfig {
        MonteCarloConfig {
            horizon_months: self.horizon_months,
            trials: self.monte_carlo_trials,
            seed: self.monte_carlo_seed,
        }
    }

    pub fn response_ttl(&self) -> Duration {
        Duration::from_secs(self.response_cache_ttl_secs)
    }
}
