//! Server API functions for the clinic walk-in queue.
//!
//! This crate contains all shared fullstack server functions for:
//! - Walk-in intake and the public queue views (list, current token, ETA)
//! - Staff operations (call next, complete, skip, reset, settings)
//! - Real-time events (SSE formatting for the web server)

mod staff;
mod types;
mod walkin;

#[cfg(feature = "server")]
mod auth;

#[cfg(feature = "server")]
mod config;

#[cfg(feature = "server")]
mod init;

#[cfg(feature = "server")]
mod realtime;

// Re-export all server functions
pub use staff::*;
pub use types::*;
pub use walkin::*;

#[cfg(feature = "server")]
pub use auth::{AuthError, Claims, StaffAuth};

#[cfg(feature = "server")]
pub use config::{ConfigError, ServerConfig};

#[cfg(feature = "server")]
pub use init::*;

#[cfg(feature = "server")]
pub use realtime::*;

// Re-export core types for convenience
pub use walkin_core::{
    EntryStatus, QueueEntry, QueueError, QueueEvent, QueueSummary, Settings, TokenNo,
};
