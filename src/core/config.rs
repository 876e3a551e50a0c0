use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::{DashError, Result};

/// Tunables for a dashboard instance.
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Samples kept per series
    pub max_len: usize,
    /// Minimum spacing between two stored samples of one series
    pub sample_period_us: u64,
    /// Trailing time span each chart shows
    pub window_ms: u64,
    /// Redraw cadence
    pub tick_ms: u64,
    /// Report the dashboard's own memory and task count
    pub self_metrics: bool,
    pub self_metrics_interval_ms: u64,
    /// Lines kept by the stdout/stderr panes
    pub scrollback_lines: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_len: 1024,
            // 60 fps
            sample_period_us: 16_667,
            window_ms: 10_000,
            tick_ms: 100,
            self_metrics: true,
            self_metrics_interval_ms: 100,
            scrollback_lines: 1000,
        }
    }
}

impl DashboardConfig {
    /// Load a JSON config file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .map_err(|e| DashError::io_context(format!("Failed to read config {:?}", path), e))?;

        let config: DashboardConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_len == 0 {
            return Err(DashError::config("max_len must be at least 1"));
        }
        if self.window_ms == 0 {
            return Err(DashError::config("window_ms must be at least 1"));
        }
        if self.tick_ms == 0 {
            return Err(DashError::config("tick_ms must be at least 1"));
        }
        if self.self_metrics && self.self_metrics_interval_ms == 0 {
            return Err(DashError::config(
                "self_metrics_interval_ms must be at least 1",
            ));
        }
        Ok(())
    }

    pub fn sample_period(&self) -> Duration {
        Duration::from_micros(self.sample_period_us)
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn self_metrics_interval(&self) -> Duration {
        Duration::from_millis(self.self_metrics_interval_ms)
    }
}
