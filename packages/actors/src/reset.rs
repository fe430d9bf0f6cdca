//! Operating day bookkeeping for the daily reset.

use chrono::NaiveDate;

/// Which operating day was last reset, and whether another reset is due.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResetState {
    last_reset_day: Option<NaiveDate>,
}

impl ResetState {
    pub fn last_reset_day(&self) -> Option<NaiveDate> {
        self.last_reset_day
    }

    /// Whether the marker has been loaded from the store.
    pub fn is_known(&self) -> bool {
        self.last_reset_day.is_some()
    }

    /// A reset is due once the calendar has moved past the last reset day.
    pub fn is_due(&self, today: NaiveDate) -> bool {
        matches!(self.last_reset_day, Some(last) if today > last)
    }

    pub fn mark_reset(&mut self, day: NaiveDate) {
        self.last_reset_day = Some(day);
    }

    /// Drop the cached marker so the next check reloads it from the store.
    pub fn forget(&mut self) {
        self.last_reset_day = None;
    }
}
