//! Queue settings and the wait estimate.

use serde::{Deserialize, Serialize};

use crate::{QueueError, QueueResult};

/// Staff-tunable queue settings. Exactly one instance exists in the store.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Average minutes spent with each patient.
    pub avg_service_time_minutes: f64,
}

impl Settings {
    /// Build validated settings.
    pub fn new(avg_service_time_minutes: f64) -> QueueResult<Self> {
        let settings = Self {
            avg_service_time_minutes,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Reject zero, negative and non-finite service times.
    pub fn validate(&self) -> QueueResult<()> {
        if !self.avg_service_time_minutes.is_finite() || self.avg_service_time_minutes <= 0.0 {
            return Err(QueueError::validation(format!(
                "avg_service_time_minutes must be a positive number, got {}",
                self.avg_service_time_minutes
            )));
        }
        Ok(())
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            avg_service_time_minutes: 10.0,
        }
    }
}

/// Minutes a patient can expect to wait with `ahead` waiting patients in front.
pub fn estimate_wait_minutes(ahead: u64, avg_service_time_minutes: f64) -> f64 {
    ahead as f64 * avg_service_time_minutes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_multiplies_ahead_by_service_time() {
        assert_eq!(estimate_wait_minutes(0, 10.0), 0.0);
        assert_eq!(estimate_wait_minutes(2, 10.0), 20.0);
        assert_eq!(estimate_wait_minutes(3, 7.5), 22.5);
    }

    #[test]
    fn settings_reject_non_positive() {
        assert!(Settings::new(12.0).is_ok());
        assert!(matches!(Settings::new(0.0), Err(QueueError::Validation(_))));
        assert!(matches!(Settings::new(-3.0), Err(QueueError::Validation(_))));
        assert!(matches!(Settings::new(f64::NAN), Err(QueueError::Validation(_))));
    }
}
