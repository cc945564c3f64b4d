use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::clusterer::{ClusterError, DEFAULT_POINT_COUNT, DEFAULT_TOLERANCE, Domain, InitStrategy};

/// Period between auto-step ticks
pub const DEFAULT_AUTO_STEP_PERIOD_MS: u64 = 1000;
/// Period between run-to-convergence ticks
pub const DEFAULT_RUN_PERIOD_MS: u64 = 100;
pub const DEFAULT_K: usize = 3;

/// Settings a clustering session is created with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub k: usize,
    pub strategy: InitStrategy,
    pub domain: Domain,
    /// Centroids moving less than this between steps are settled
    pub tolerance: f64,
    pub auto_step_period_ms: u64,
    pub run_period_ms: u64,
    /// Fixed RNG seed; entropy when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub point_count: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            strategy: InitStrategy::default(),
            domain: Domain::default(),
            tolerance: DEFAULT_TOLERANCE,
            auto_step_period_ms: DEFAULT_AUTO_STEP_PERIOD_MS,
            run_period_ms: DEFAULT_RUN_PERIOD_MS,
            seed: None,
            point_count: DEFAULT_POINT_COUNT,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn with_strategy(mut self, strategy: InitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_domain(mut self, domain: Domain) -> Self {
        self.domain = domain;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn with_periods(mut self, auto_step_ms: u64, run_ms: u64) -> Self {
        self.auto_step_period_ms = auto_step_ms;
        self.run_period_ms = run_ms;
        self
    }

    pub fn auto_step_period(&self) -> Duration {
        Duration::from_millis(self.auto_step_period_ms)
    }

    pub fn run_period(&self) -> Duration {
        Duration::from_millis(self.run_period_ms)
    }

    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.k == 0 {
            return Err(ClusterError::InvalidClusterCount(self.k));
        }

        if !self.domain.is_valid() {
            return Err(ClusterError::InvalidDomain {
                min: self.domain.min,
                max: self.domain.max,
            });
        }

        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(ClusterError::InvalidConfig(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }

        if self.auto_step_period_ms == 0 || self.run_period_ms == 0 {
            return Err(ClusterError::InvalidConfig(format!(
                "step periods must be non-zero (auto_step_period_ms={}, run_period_ms={})",
                self.auto_step_period_ms, self.run_period_ms
            )));
        }

        Ok(())
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SessionConfig =
            serde_json::from_str(json).context("Failed to parse session config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_json_str(&json)
    }
}
