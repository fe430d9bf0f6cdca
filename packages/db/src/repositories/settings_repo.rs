//! Settings singleton repository.

use serde::Deserialize;
use surrealdb::sql::Thing;
use walkin_core::Settings;

use crate::{DbError, get_db};

/// Repository for the single settings record.
pub struct SettingsRepository;

#[derive(Debug, Deserialize)]
struct SettingsRecord {
    #[allow(dead_code)]
    id: Option<Thing>,
    avg_service_time_minutes: f64,
}

impl SettingsRepository {
    /// Read the settings, `None` if the record has not been created yet.
    pub async fn read() -> Result<Option<Settings>, DbError> {
        let db = get_db()?;

        let record: Option<SettingsRecord> = db.select(("settings", "main")).await?;

        Ok(record.map(|r| Settings {
            avg_service_time_minutes: r.avg_service_time_minutes,
        }))
    }

    /// Read the settings, falling back to `default` when absent.
    pub async fn read_or(default: Settings) -> Result<Settings, DbError> {
        Ok(Self::read().await?.unwrap_or(default))
    }

    /// Create the settings record with `default` unless it already exists.
    pub async fn ensure(default: Settings) -> Result<Settings, DbError> {
        if let Some(existing) = Self::read().await? {
            return Ok(existing);
        }

        tracing::info!(
            "Seeding settings with avg_service_time_minutes = {}",
            default.avg_service_time_minutes
        );
        Self::write(default).await
    }

    /// Replace the settings.
    pub async fn write(settings: Settings) -> Result<Settings, DbError> {
        let db = get_db()?;

        let mut result = db
            .query("UPSERT settings:main SET avg_service_time_minutes = $minutes RETURN AFTER")
            .bind(("minutes", settings.avg_service_time_minutes))
            .await?;

        let records: Vec<SettingsRecord> = result.take(0)?;

        records
            .into_iter()
            .next()
            .map(|r| Settings {
                avg_service_time_minutes: r.avg_service_time_minutes,
            })
            .ok_or_else(|| DbError::Query("Failed to write settings".into()))
    }
}
