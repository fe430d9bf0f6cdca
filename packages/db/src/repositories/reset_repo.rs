//! Persisted marker of the last operating day that was reset.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::repositories::EntryRepository;
use crate::{DbError, get_db};

/// Repository for the daily reset marker.
pub struct ResetLogRepository;

#[derive(Debug, Deserialize)]
struct ResetLogRecord {
    last_reset_day: NaiveDate,
}

impl ResetLogRepository {
    /// Day of the most recent reset, if one was ever recorded.
    pub async fn last_reset_day() -> Result<Option<NaiveDate>, DbError> {
        let db = get_db()?;

        let mut result = db
            .query("SELECT last_reset_day FROM reset_log:walkin")
            .await?;

        let records: Vec<ResetLogRecord> = result.take(0)?;

        Ok(records.into_iter().next().map(|r| r.last_reset_day))
    }

    /// Record that `day` has been reset.
    pub async fn record_reset(day: NaiveDate) -> Result<(), DbError> {
        let db = get_db()?;

        db.query("UPSERT reset_log:walkin SET last_reset_day = $day, reset_at = time::now()")
            .bind(("day", day.to_string()))
            .await?
            .check()?;

        Ok(())
    }

    /// Delete every entry and record `day` as reset, in one transaction.
    ///
    /// Either both happen or neither does. Returns how many entries were removed.
    pub async fn reset_day(day: NaiveDate) -> Result<u64, DbError> {
        let db = get_db()?;

        let removed = EntryRepository::count_all().await?;

        db.query(
            r#"
            BEGIN TRANSACTION;
            DELETE walkin_entry;
            UPSERT reset_log:walkin SET last_reset_day = $day, reset_at = time::now();
            COMMIT TRANSACTION;
            "#,
        )
        .bind(("day", day.to_string()))
        .await?
        .check()?;

        Ok(removed)
    }
}
