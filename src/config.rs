//! Configuration types for the polling monitor

use std::time::Duration;

use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Monitor-level configuration
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Interval of the status-only refresh cycle (default: 15s)
    pub fast_interval: Duration,

    /// Interval of the status + history refresh cycle (default: 30s)
    pub slow_interval: Duration,

    /// Maximum number of samples retained for the trend view (default: 50)
    pub history_capacity: usize,

    /// Number of samples requested per history fetch (default: 50)
    pub history_results: usize,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            fast_interval: Duration::from_secs(15),
            slow_interval: Duration::from_secs(30),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            history_results: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl MonitorConfig {
    /// Create a configuration with custom cycle intervals
    pub fn with_intervals(fast_interval: Duration, slow_interval: Duration) -> Self {
        Self {
            fast_interval,
            slow_interval,
            ..Default::default()
        }
    }

    /// Create a configuration with custom history sizing
    pub fn with_history(capacity: usize, results: usize) -> Self {
        Self {
            history_capacity: capacity,
            history_results: results,
            ..Default::default()
        }
    }
}
