//! Database schema definitions using SurrealQL.

use crate::{DbError, get_db};

/// Initialize the database schema.
///
/// This creates all necessary tables, fields, and indexes.
pub async fn init_schema() -> Result<(), DbError> {
    let db = get_db()?;

    tracing::info!("Initializing database schema...");

    db.query(ENTRY_SCHEMA).await?.check()?;
    db.query(SETTINGS_SCHEMA).await?.check()?;
    db.query(RESET_LOG_SCHEMA).await?.check()?;

    tracing::info!("Database schema initialized");

    Ok(())
}

/// Walk-in entry table schema.
const ENTRY_SCHEMA: &str = r#"
-- One row per issued token for the current operating day
DEFINE TABLE IF NOT EXISTS walkin_entry SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS token_no ON walkin_entry TYPE int ASSERT $value > 0;
DEFINE FIELD IF NOT EXISTS patient_ref ON walkin_entry TYPE option<string>;
DEFINE FIELD IF NOT EXISTS doctor_ref ON walkin_entry TYPE option<string>;
DEFINE FIELD IF NOT EXISTS status ON walkin_entry TYPE string DEFAULT "waiting"
    ASSERT $value IN ["waiting", "called", "completed", "skipped"];
DEFINE FIELD IF NOT EXISTS operating_day ON walkin_entry TYPE string;
DEFINE FIELD IF NOT EXISTS created_at ON walkin_entry TYPE datetime DEFAULT time::now();
DEFINE FIELD IF NOT EXISTS updated_at ON walkin_entry TYPE datetime DEFAULT time::now();

-- At most one entry per token number
DEFINE INDEX IF NOT EXISTS walkin_token ON walkin_entry FIELDS token_no UNIQUE;

-- Status lookups scan the day's rows; an index on status served stale
-- aggregate counts after status updates
REMOVE INDEX IF EXISTS walkin_status ON walkin_entry;
"#;

/// Settings singleton schema.
const SETTINGS_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS settings SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS avg_service_time_minutes ON settings TYPE number ASSERT $value > 0;
"#;

/// Daily reset marker schema.
const RESET_LOG_SCHEMA: &str = r#"
DEFINE TABLE IF NOT EXISTS reset_log SCHEMAFULL;

DEFINE FIELD IF NOT EXISTS last_reset_day ON reset_log TYPE string;
DEFINE FIELD IF NOT EXISTS reset_at ON reset_log TYPE datetime DEFAULT time::now();
"#;
