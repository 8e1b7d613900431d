//! Engine configuration (engagement policy, expiry, concurrency)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::application::{DispatcherConfig, EngagementPolicy, SweeperConfig};

/// Engine configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// What to do when a challenge names someone already dueling
    #[serde(default)]
    pub engagement_policy: EngagementPolicy,

    /// Seconds an unresolved duel may wait; 0 disables expiry
    #[serde(default)]
    pub session_ttl_secs: u64,

    /// Seconds between expiry sweeps
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,

    /// Maximum inbound events handled concurrently
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl EngineConfig {
    pub fn expiry_enabled(&self) -> bool {
        self.session_ttl_secs > 0
    }

    /// Sweeper settings, or `None` when expiry is disabled.
    pub fn sweeper(&self) -> Option<SweeperConfig> {
        self.expiry_enabled().then(|| {
            SweeperConfig::default()
                .with_session_ttl(Duration::from_secs(self.session_ttl_secs))
                .with_sweep_interval(Duration::from_secs(self.sweep_interval_secs))
        })
    }

    pub fn dispatcher(&self) -> DispatcherConfig {
        DispatcherConfig::default().with_max_in_flight(self.max_in_flight)
    }

    /// Validate engine configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_in_flight == 0 || self.max_in_flight > 10_000 {
            return Err(ValidationError::InvalidMaxInFlight);
        }
        if self.expiry_enabled() {
            if self.sweep_interval_secs == 0 {
                return Err(ValidationError::InvalidSweepInterval);
            }
            if self.sweep_interval_secs > self.session_ttl_secs {
                return Err(ValidationError::SweepIntervalExceedsTtl);
            }
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engagement_policy: EngagementPolicy::default(),
            session_ttl_secs: 0,
            sweep_interval_secs: default_sweep_interval(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_max_in_flight() -> usize {
    64
}
