//! Core domain types for the walk-in queue.
//!
//! This crate contains shared types used across all packages:
//! - QueueEntry, TokenNo and EntryStatus for walk-in tickets
//! - Settings and the wait estimate formula
//! - Events for real-time updates
//! - QueueError, the error taxonomy surfaced by every queue operation

mod entry;
mod error;
mod events;
mod settings;

pub use entry::{EntryId, EntryStatus, NewEntry, QueueEntry, QueueSummary, TokenNo};
pub use error::{QueueError, QueueResult};
pub use events::QueueEvent;
pub use settings::{Settings, estimate_wait_minutes};
