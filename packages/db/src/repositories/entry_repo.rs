//! Walk-in entry repository.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use walkin_core::{EntryId, EntryStatus, QueueEntry, TokenNo};

use crate::{DbError, get_db};

const TABLE: &str = "walkin_entry";

/// Repository for walk-in entry persistence.
pub struct EntryRepository;

/// Internal record type for SurrealDB reads.
#[derive(Debug, Deserialize)]
struct EntryRecord {
    id: Thing,
    token_no: i64,
    patient_ref: Option<String>,
    doctor_ref: Option<String>,
    status: EntryStatus,
    operating_day: NaiveDate,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRecord {
    fn into_entry(self) -> Result<QueueEntry, DbError> {
        let raw = self.id.id.to_raw();
        let id = EntryId::parse(&raw)
            .map_err(|e| DbError::Serialization(format!("bad entry id {raw}: {e}")))?;
        let token_no = u64::try_from(self.token_no)
            .map_err(|_| DbError::Serialization(format!("bad token_no {}", self.token_no)))?;

        Ok(QueueEntry {
            id,
            token_no: TokenNo(token_no),
            patient_ref: self.patient_ref,
            doctor_ref: self.doctor_ref,
            status: self.status,
            operating_day: self.operating_day,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn into_entries(records: Vec<EntryRecord>) -> Result<Vec<QueueEntry>, DbError> {
    records.into_iter().map(EntryRecord::into_entry).collect()
}

/// Insert payload - omits datetime fields so SurrealDB applies its defaults.
#[derive(Debug, Serialize)]
struct EntryCreate {
    token_no: i64,
    patient_ref: Option<String>,
    doctor_ref: Option<String>,
    status: EntryStatus,
    operating_day: NaiveDate,
}

/// Sort order on token number.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TokenOrder {
    #[default]
    Ascending,
    Descending,
}

impl TokenOrder {
    fn as_sql(self) -> &'static str {
        match self {
            TokenOrder::Ascending => "ASC",
            TokenOrder::Descending => "DESC",
        }
    }
}

/// Filter options for listing entries.
#[derive(Debug, Default, Clone)]
pub struct EntryFilter {
    pub status: Option<EntryStatus>,
    /// Only entries with a token strictly below this one.
    pub before_token: Option<TokenNo>,
    pub doctor_ref: Option<String>,
    pub order: TokenOrder,
    pub limit: Option<usize>,
}

impl EntryFilter {
    pub fn with_status(status: EntryStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }
}

impl EntryRepository {
    /// Insert a new entry.
    pub async fn insert(entry: &QueueEntry) -> Result<QueueEntry, DbError> {
        let db = get_db()?;

        let create = EntryCreate {
            token_no: entry.token_no.get() as i64,
            patient_ref: entry.patient_ref.clone(),
            doctor_ref: entry.doctor_ref.clone(),
            status: entry.status,
            operating_day: entry.operating_day,
        };

        let record: Option<EntryRecord> = db
            .create((TABLE, entry.id.to_string()))
            .content(create)
            .await?;

        record
            .ok_or_else(|| DbError::Query("Failed to create entry".into()))?
            .into_entry()
    }

    /// Get an entry by ID.
    pub async fn get(id: EntryId) -> Result<QueueEntry, DbError> {
        let db = get_db()?;

        let record: Option<EntryRecord> = db.select((TABLE, id.to_string())).await?;

        record
            .ok_or_else(|| DbError::NotFound(format!("Entry not found: {}", id)))?
            .into_entry()
    }

    /// Get an entry by token number.
    pub async fn get_by_token(token_no: TokenNo) -> Result<QueueEntry, DbError> {
        let db = get_db()?;

        let mut result = db
            .query("SELECT * FROM walkin_entry WHERE token_no = $token_no LIMIT 1")
            .bind(("token_no", token_no.get() as i64))
            .await?;

        let records: Vec<EntryRecord> = result.take(0)?;

        records
            .into_iter()
            .next()
            .ok_or_else(|| DbError::NotFound(format!("Token not found: {}", token_no)))?
            .into_entry()
    }

    /// List entries with optional filtering, ordered by token number.
    pub async fn list(filter: EntryFilter) -> Result<Vec<QueueEntry>, DbError> {
        let db = get_db()?;

        let mut conditions = Vec::new();
        let mut bindings: Vec<(&str, serde_json::Value)> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = $status");
            bindings.push(("status", serde_json::json!(status.as_str())));
        }

        if let Some(before) = filter.before_token {
            conditions.push("token_no < $before");
            bindings.push(("before", serde_json::json!(before.get())));
        }

        if let Some(doctor_ref) = &filter.doctor_ref {
            conditions.push("doctor_ref = $doctor_ref");
            bindings.push(("doctor_ref", serde_json::json!(doctor_ref)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit_clause = filter
            .limit
            .map(|l| format!("LIMIT {}", l))
            .unwrap_or_default();

        let query = format!(
            "SELECT * FROM walkin_entry {} ORDER BY token_no {} {}",
            where_clause,
            filter.order.as_sql(),
            limit_clause
        );

        let mut result = db.query(&query);

        for (name, value) in bindings {
            result = result.bind((name, value));
        }

        let mut response = result.await?;
        let records: Vec<EntryRecord> = response.take(0)?;

        into_entries(records)
    }

    /// Lowest-numbered waiting entry, if any.
    pub async fn first_waiting() -> Result<Option<QueueEntry>, DbError> {
        let filter = EntryFilter {
            limit: Some(1),
            ..EntryFilter::with_status(EntryStatus::Waiting)
        };
        Ok(Self::list(filter).await?.into_iter().next())
    }

    /// Highest-numbered called entry, if any.
    pub async fn latest_called() -> Result<Option<QueueEntry>, DbError> {
        let filter = EntryFilter {
            order: TokenOrder::Descending,
            limit: Some(1),
            ..EntryFilter::with_status(EntryStatus::Called)
        };
        Ok(Self::list(filter).await?.into_iter().next())
    }

    /// Number of waiting entries with a token strictly below `token_no`.
    pub async fn count_waiting_before(token_no: TokenNo) -> Result<u64, DbError> {
        let db = get_db()?;

        let mut result = db
            .query(
                r#"
                SELECT VALUE id FROM walkin_entry
                WHERE status = "waiting" AND token_no < $token_no
                "#,
            )
            .bind(("token_no", token_no.get() as i64))
            .await?;

        let ids: Vec<Thing> = result.take(0)?;

        Ok(ids.len() as u64)
    }

    /// Number of entries currently stored.
    pub async fn count_all() -> Result<u64, DbError> {
        let db = get_db()?;

        let mut result = db.query("SELECT VALUE id FROM walkin_entry").await?;
        let ids: Vec<Thing> = result.take(0)?;

        Ok(ids.len() as u64)
    }

    /// Highest token number stored, 0 when the table is empty.
    pub async fn high_water_mark() -> Result<u64, DbError> {
        let filter = EntryFilter {
            order: TokenOrder::Descending,
            limit: Some(1),
            ..Default::default()
        };
        Ok(Self::list(filter)
            .await?
            .first()
            .map_or(0, |entry| entry.token_no.get()))
    }

    /// Move an entry from `from` to `to`.
    ///
    /// Applies only while the stored status still equals `from`; a concurrent
    /// change is reported as `StatusConflict` with the status actually found.
    pub async fn update_status(
        id: EntryId,
        from: EntryStatus,
        to: EntryStatus,
    ) -> Result<QueueEntry, DbError> {
        let db = get_db()?;

        let mut result = db
            .query(
                "UPDATE type::thing('walkin_entry', $id) SET status = $to, updated_at = time::now() WHERE status = $from RETURN AFTER",
            )
            .bind(("id", id.to_string()))
            .bind(("from", from.as_str()))
            .bind(("to", to.as_str()))
            .await?;

        let records: Vec<EntryRecord> = result.take(0)?;

        if let Some(record) = records.into_iter().next() {
            return record.into_entry();
        }

        let current = Self::get(id).await?;
        Err(DbError::StatusConflict {
            actual: current.status,
            requested: to,
        })
    }

    /// Delete every entry, returning how many were removed.
    pub async fn clear_all() -> Result<u64, DbError> {
        let db = get_db()?;

        let removed: Vec<EntryRecord> = db.delete(TABLE).await?;

        Ok(removed.len() as u64)
    }

    /// Count entries by status.
    pub async fn count_by_status() -> Result<HashMap<EntryStatus, u64>, DbError> {
        let db = get_db()?;

        let mut result = db.query("SELECT VALUE status FROM walkin_entry").await?;
        let statuses: Vec<EntryStatus> = result.take(0)?;

        let mut counts = HashMap::new();
        for status in statuses {
            *counts.entry(status).or_insert(0) += 1;
        }

        Ok(counts)
    }
}
