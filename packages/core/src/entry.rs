//! Walk-in queue entries and their status lifecycle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::{QueueError, QueueResult};

/// Unique internal identifier for a queue entry, using ULID for chronological sorting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Ulid);

impl EntryId {
    /// Create a new unique entry ID.
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Parse an entry ID from a string.
    pub fn parse(s: &str) -> Result<Self, ulid::DecodeError> {
        Ok(Self(Ulid::from_string(s)?))
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket number handed to a walk-in patient. Positive, restarts at 1 every operating day.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TokenNo(pub u64);

impl TokenNo {
    /// First token of an operating day.
    pub const FIRST: TokenNo = TokenNo(1);

    /// Build a token from a raw number, rejecting zero.
    pub fn new(value: u64) -> QueueResult<Self> {
        if value == 0 {
            return Err(QueueError::validation("token number must be positive"));
        }
        Ok(Self(value))
    }

    /// Parse a token reference as received from a request path.
    pub fn parse(raw: &str) -> QueueResult<Self> {
        let trimmed = raw.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| QueueError::validation(format!("invalid token number: {trimmed:?}")))?;
        if value <= 0 {
            return Err(QueueError::validation(format!(
                "token number must be positive, got {value}"
            )));
        }
        Ok(Self(value as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for TokenNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a walk-in entry.
///
/// `waiting -> called -> completed | skipped`. Completed and skipped are terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[default]
    Waiting,
    Called,
    Completed,
    Skipped,
}

impl EntryStatus {
    pub const ALL: [EntryStatus; 4] = [
        EntryStatus::Waiting,
        EntryStatus::Called,
        EntryStatus::Completed,
        EntryStatus::Skipped,
    ];

    /// Check if the entry is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, EntryStatus::Completed | EntryStatus::Skipped)
    }

    /// Whether `self -> next` is an allowed edge.
    pub fn can_transition_to(&self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Waiting, EntryStatus::Called)
                | (EntryStatus::Called, EntryStatus::Completed)
                | (EntryStatus::Called, EntryStatus::Skipped)
        )
    }

    /// Validate a transition, returning the new status.
    pub fn transition(self, next: EntryStatus) -> QueueResult<EntryStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(QueueError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Get a simple status string for display and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::Called => "called",
            EntryStatus::Completed => "completed",
            EntryStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = QueueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntryStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| QueueError::validation(format!("unknown status: {s}")))
    }
}

/// Request to put a walk-in patient in the queue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(default)]
    pub patient_ref: Option<String>,
    #[serde(default)]
    pub doctor_ref: Option<String>,
}

impl NewEntry {
    pub fn new(patient_ref: Option<String>, doctor_ref: Option<String>) -> Self {
        Self {
            patient_ref: normalize_ref(patient_ref),
            doctor_ref: normalize_ref(doctor_ref),
        }
    }

    /// An anonymous walk-in with no assigned doctor.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

fn normalize_ref(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A walk-in queue entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueEntry {
    /// Internal identifier.
    pub id: EntryId,
    /// Ticket number for the operating day.
    pub token_no: TokenNo,
    /// Opaque patient reference, absent for anonymous walk-ins.
    #[serde(default)]
    pub patient_ref: Option<String>,
    /// Assigned practitioner, if any.
    #[serde(default)]
    pub doctor_ref: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Operating day the token was issued for.
    pub operating_day: NaiveDate,
    /// When the entry was accepted.
    pub created_at: DateTime<Utc>,
    /// When the entry last changed status.
    pub updated_at: DateTime<Utc>,
}

impl QueueEntry {
    /// Create a new waiting entry for the given token.
    pub fn waiting(token_no: TokenNo, request: NewEntry, operating_day: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: EntryId::new(),
            token_no,
            patient_ref: request.patient_ref,
            doctor_ref: request.doctor_ref,
            status: EntryStatus::Waiting,
            operating_day,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Counts per status plus the token currently being served.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSummary {
    pub waiting: u64,
    pub called: u64,
    pub completed: u64,
    pub skipped: u64,
    pub current_called: Option<TokenNo>,
}

impl QueueSummary {
    /// Total entries issued today.
    pub fn total(&self) -> u64 {
        self.waiting + self.called + self.completed + self.skipped
    }
}
