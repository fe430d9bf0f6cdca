//! Repository implementations for database operations.

mod entry_repo;
mod reset_repo;
mod settings_repo;

pub use entry_repo::{EntryFilter, EntryRepository, TokenOrder};
pub use reset_repo::ResetLogRepository;
pub use settings_repo::SettingsRepository;
