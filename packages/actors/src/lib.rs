//! Actor system for the walk-in queue.
//!
//! This crate provides the Ractor-based actors that serialize every
//! mutation of the walk-in queue and clear it at the start of each
//! operating day.
//!
//! # Architecture
//!
//! - `WalkInActor` - Issues tokens, calls the next patient and rolls the day over
//! - `ResetScheduler` - Nudges the actor to roll over once the calendar date changes
//! - `EventBus` - Fan-out of queue events to live subscribers
//!
//! # Usage
//!
//! ```ignore
//! use actors::{LocalClock, WalkInConfig, start_walk_in};
//!
//! db::init(db::DbConfig::memory()).await?;
//! let system = start_walk_in(WalkInConfig::default(), Arc::new(LocalClock)).await?;
//!
//! let entry = system.handle().enqueue(NewEntry::anonymous()).await?;
//! let called = system.handle().call_next().await?;
//! ```

mod clock;
mod config;
mod events;
mod handle;
mod messages;
pub mod registry;
mod reset;
mod scheduler;
mod sequencer;
mod store;
mod system;
mod walkin_actor;

pub use clock::{Clock, LocalClock, ManualClock};
pub use config::{STORE_CALLS_PER_REQUEST, WalkInConfig};
pub use events::EventBus;
pub use handle::WalkInHandle;
pub use messages::{SchedulerMessage, WalkInMessage};
pub use registry::{WalkInRegistry, global_registry};
pub use reset::ResetState;
pub use scheduler::ResetScheduler;
pub use sequencer::TokenSequencer;
pub use system::{StartError, WalkInSystem, start_walk_in};
pub use walkin_actor::{WalkInActor, WalkInArgs};

/// Re-export ractor types for convenience.
pub use ractor::{Actor, ActorRef, RpcReplyPort, concurrency};
