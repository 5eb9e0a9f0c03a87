//! Monitor configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables for the monitoring screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds between automatic refreshes
    pub refresh_interval_secs: u64,
}

impl MonitorConfig {
    /// Refresh cadence as a [`Duration`]. Zero is raised to one second.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 10,
        }
    }
}
