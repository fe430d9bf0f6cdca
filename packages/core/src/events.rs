//! Event types for real-time updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::TokenNo;

/// Events published to dashboards and token displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "kebab-case")]
pub enum QueueEvent {
    /// Queue contents or an entry's status changed; subscribers should re-fetch.
    QueueUpdate { timestamp: DateTime<Utc> },
    /// A token was just called to the desk.
    CallUpdate {
        token_no: TokenNo,
        timestamp: DateTime<Utc>,
    },
}

impl QueueEvent {
    pub fn queue_update() -> Self {
        QueueEvent::QueueUpdate {
            timestamp: Utc::now(),
        }
    }

    pub fn call_update(token_no: TokenNo) -> Self {
        QueueEvent::CallUpdate {
            token_no,
            timestamp: Utc::now(),
        }
    }

    /// Wire name of the event, as used on the real-time channel.
    pub fn name(&self) -> &'static str {
        match self {
            QueueEvent::QueueUpdate { .. } => "queue-update",
            QueueEvent::CallUpdate { .. } => "call-update",
        }
    }

    /// Get the timestamp of the event.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            QueueEvent::QueueUpdate { timestamp } => *timestamp,
            QueueEvent::CallUpdate { timestamp, .. } => *timestamp,
        }
    }

    /// Token carried by the event, if any.
    pub fn token_no(&self) -> Option<TokenNo> {
        match self {
            QueueEvent::CallUpdate { token_no, .. } => Some(*token_no),
            QueueEvent::QueueUpdate { .. } => None,
        }
    }

    /// Get a short description of this event for logging.
    pub fn description(&self) -> String {
        match self {
            QueueEvent::QueueUpdate { .. } => "Queue updated".to_string(),
            QueueEvent::CallUpdate { token_no, .. } => format!("Token {} called", token_no),
        }
    }
}
