//! Provisioner configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling cadence and default deadline for index provisioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerConfig {
    /// Pause between store polls, in milliseconds
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Default deadline budget for a full seed pipeline, in milliseconds
    #[serde(default = "default_budget_ms")]
    pub budget_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    300
}

fn default_budget_ms() -> u64 {
    60_000
}

impl Default for ProvisionerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            budget_ms: default_budget_ms(),
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from environment variables
    ///
    /// Variables are read with the `SEARCH_PROVISIONER_` prefix
    /// (e.g. `SEARCH_PROVISIONER_POLL_INTERVAL_MS=500`), falling back to
    /// the defaults for anything unset.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .set_default("poll_interval_ms", default_poll_interval_ms())?
            .set_default("budget_ms", default_budget_ms())?
            .add_source(
                config::Environment::with_prefix("SEARCH_PROVISIONER").try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// Pause between store polls
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Default deadline budget
    pub fn budget(&self) -> Duration {
        Duration::from_millis(self.budget_ms)
    }
}

/// Builder for [`ProvisionerConfig`]
pub struct ProvisionerConfigBuilder {
    config: ProvisionerConfig,
}

impl ProvisionerConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ProvisionerConfig::default(),
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn budget(mut self, budget: Duration) -> Self {
        self.config.budget_ms = budget.as_millis() as u64;
        self
    }

    pub fn build(self) -> ProvisionerConfig {
        self.config
    }
}

impl Default for ProvisionerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
