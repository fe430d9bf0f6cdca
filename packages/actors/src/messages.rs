//! Message types for actor communication.

use chrono::NaiveDate;
use ractor::RpcReplyPort;
use walkin_core::{EntryStatus, NewEntry, QueueEntry, QueueResult, TokenNo};

/// Messages for the WalkInActor.
///
/// Every mutation of the walk-in queue goes through this mailbox, which is
/// processed one message at a time.
#[derive(Debug)]
pub enum WalkInMessage {
    /// Issue the next token and add a waiting entry.
    Enqueue {
        request: NewEntry,
        reply: RpcReplyPort<QueueResult<QueueEntry>>,
    },

    /// Call the lowest waiting token.
    CallNext {
        reply: RpcReplyPort<QueueResult<Option<QueueEntry>>>,
    },

    /// Move a called token to a terminal status.
    Transition {
        token_no: TokenNo,
        to: EntryStatus,
        reply: RpcReplyPort<QueueResult<QueueEntry>>,
    },

    /// Remove every entry and restart numbering at 1.
    ClearDay {
        reply: RpcReplyPort<QueueResult<u64>>,
    },

    /// Start a new operating day if the calendar has moved on.
    RollOver {
        reply: RpcReplyPort<QueueResult<Option<u64>>>,
    },

    /// Last operating day reset, if the marker has been loaded.
    OperatingDay {
        reply: RpcReplyPort<QueueResult<Option<NaiveDate>>>,
    },

    /// Stop the actor.
    Shutdown,
}

/// Messages for the ResetScheduler.
#[derive(Debug)]
pub enum SchedulerMessage {
    /// Periodic calendar check.
    Tick,

    /// Last operating day reset, answered after any earlier tick.
    LastResetDay {
        reply: RpcReplyPort<Option<NaiveDate>>,
    },

    /// Stop the scheduler.
    Shutdown,
}
