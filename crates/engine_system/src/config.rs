//! Registry configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default frame timestep: 60 updates per second.
pub const DEFAULT_TIMESTEP: Duration = Duration::from_nanos(16_666_667);

/// Configuration for a [`Registry`](crate::Registry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fixed timestep handed to components on every update.
    pub timestep: Duration,
    /// Update passes slower than this are logged as warnings. `None` disables
    /// the check.
    pub slow_update_threshold: Option<Duration>,
}

impl RegistryConfig {
    /// Create a config with the default timestep, warning on passes that
    /// overrun a full frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timestep: DEFAULT_TIMESTEP,
            slow_update_threshold: Some(DEFAULT_TIMESTEP),
        }
    }

    /// Override the fixed timestep.
    #[must_use]
    pub fn with_timestep(mut self, timestep: Duration) -> Self {
        self.timestep = timestep;
        self
    }

    /// Derive the timestep from a rate in updates per second.
    ///
    /// Non-positive or non-finite rates leave the timestep unchanged.
    #[must_use]
    pub fn with_tick_rate(mut self, tick_rate: f64) -> Self {
        if tick_rate.is_finite() && tick_rate > 0.0 {
            self.timestep = Duration::from_secs_f64(1.0 / tick_rate);
        }
        self
    }

    /// Override (or disable, with `None`) the slow-update warning threshold.
    #[must_use]
    pub fn with_slow_update_threshold(mut self, threshold: Option<Duration>) -> Self {
        self.slow_update_threshold = threshold;
        self
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self::new()
    }
}
