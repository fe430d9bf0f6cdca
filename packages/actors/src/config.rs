//! Runtime configuration for the walk-in subsystem.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use walkin_core::Settings;

/// Most store calls a single actor request makes: marker load, day reset,
/// marker write, sequencer reseed and the mutation itself.
pub const STORE_CALLS_PER_REQUEST: u32 = 5;

/// Configuration for the walk-in queue runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalkInConfig {
    /// Average service time used when the settings record is absent.
    pub default_service_minutes: f64,
    /// Upper bound for a single store call (milliseconds).
    pub store_timeout_ms: u64,
    /// Upper bound for a request to the walk-in actor (milliseconds).
    ///
    /// Keep it above `STORE_CALLS_PER_REQUEST` store timeouts, or callers may
    /// give up on a request the actor still commits.
    pub call_timeout_ms: u64,
    /// How often the reset scheduler checks the calendar (seconds).
    pub reset_check_interval_secs: u64,
    /// Events buffered per subscriber before the oldest are dropped.
    pub event_capacity: usize,
}

impl Default for WalkInConfig {
    fn default() -> Self {
        Self {
            default_service_minutes: 10.0,
            store_timeout_ms: 5_000,
            call_timeout_ms: 30_000,
            reset_check_interval_secs: 30,
            event_capacity: 256,
        }
    }
}

impl WalkInConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn reset_check_interval(&self) -> Duration {
        Duration::from_secs(self.reset_check_interval_secs.max(1))
    }

    /// Settings to fall back on when none are stored.
    pub fn fallback_settings(&self) -> Settings {
        Settings::new(self.default_service_minutes).unwrap_or_default()
    }

    /// Set the fallback service time.
    pub fn with_default_service_minutes(mut self, minutes: f64) -> Self {
        self.default_service_minutes = minutes;
        self
    }

    /// Set the reset check interval.
    pub fn with_reset_check_interval(mut self, secs: u64) -> Self {
        self.reset_check_interval_secs = secs;
        self
    }

    /// Set the store and actor timeouts.
    pub fn with_timeouts(mut self, store: Duration, call: Duration) -> Self {
        self.store_timeout_ms = store.as_millis() as u64;
        self.call_timeout_ms = call.as_millis() as u64;
        self
    }
}
