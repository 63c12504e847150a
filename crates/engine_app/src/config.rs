//! Frame loop configuration.

use anyhow::{Context, Result};

/// Environment variable overriding [`FrameConfig::tick_rate`].
pub const TICK_RATE_ENV: &str = "ENGINE_TICK_RATE";

/// Environment variable overriding [`FrameConfig::max_frames`].
pub const MAX_FRAMES_ENV: &str = "ENGINE_MAX_FRAMES";

/// Configuration for the host frame loop.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameConfig {
    /// Target frames per second.
    pub tick_rate: f64,
    /// Maximum number of frames to run (0 = unlimited).
    pub max_frames: u64,
    /// Log a summary every this many frames (0 = never).
    pub report_every: u64,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60.0,
            max_frames: 0,
            report_every: 60,
        }
    }
}

impl FrameConfig {
    /// Build a config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an override is set but does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from defaults plus whatever `lookup` returns for the
    /// override variables.
    ///
    /// # Errors
    ///
    /// Returns an error if an override does not parse, or the tick rate is
    /// not a positive finite number.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(TICK_RATE_ENV) {
            config.tick_rate = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {TICK_RATE_ENV}: {raw:?}"))?;
            anyhow::ensure!(
                config.tick_rate.is_finite() && config.tick_rate > 0.0,
                "{TICK_RATE_ENV} must be positive, got {}",
                config.tick_rate
            );
        }

        if let Some(raw) = lookup(MAX_FRAMES_ENV) {
            config.max_frames = raw
                .trim()
                .parse()
                .with_context(|| format!("invalid {MAX_FRAMES_ENV}: {raw:?}"))?;
        }

        Ok(config)
    }
}
