#![allow(clippy::disallowed_methods)]

mod common;

use common::TestResult;

use chrono::NaiveDate;
use walkin_core::{EntryStatus, NewEntry, QueueEntry, QueueError, Settings, TokenNo};

use db::DbError;
use db::repositories::{
    EntryFilter, EntryRepository, ResetLogRepository, SettingsRepository, TokenOrder,
};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

async fn insert_tokens(range: std::ops::RangeInclusive<u64>) -> Result<Vec<QueueEntry>, DbError> {
    let mut inserted = Vec::new();
    for n in range {
        let entry = QueueEntry::waiting(TokenNo(n), NewEntry::anonymous(), day());
        inserted.push(EntryRepository::insert(&entry).await?);
    }
    Ok(inserted)
}

#[test]
fn insert_get_and_list_in_token_order() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        let request = NewEntry::new(Some("patient-9".into()), Some("dr-house".into()));
        let entry = QueueEntry::waiting(TokenNo(2), request, day());
        let created = EntryRepository::insert(&entry).await?;
        assert_eq!(created.id, entry.id);
        assert_eq!(created.token_no, TokenNo(2));
        assert_eq!(created.patient_ref.as_deref(), Some("patient-9"));
        assert_eq!(created.status, EntryStatus::Waiting);
        assert_eq!(created.operating_day, day());

        insert_tokens(1..=1).await?;
        insert_tokens(3..=3).await?;

        let loaded = EntryRepository::get(entry.id).await?;
        assert_eq!(loaded.doctor_ref.as_deref(), Some("dr-house"));

        let by_token = EntryRepository::get_by_token(TokenNo(2)).await?;
        assert_eq!(by_token.id, entry.id);

        let all = EntryRepository::list(EntryFilter::default()).await?;
        let tokens: Vec<u64> = all.iter().map(|e| e.token_no.get()).collect();
        assert_eq!(tokens, vec![1, 2, 3]);

        let desc = EntryRepository::list(EntryFilter {
            order: TokenOrder::Descending,
            ..Default::default()
        })
        .await?;
        assert_eq!(desc.first().map(|e| e.token_no), Some(TokenNo(3)));

        let by_doctor = EntryRepository::list(EntryFilter {
            doctor_ref: Some("dr-house".into()),
            ..Default::default()
        })
        .await?;
        assert_eq!(by_doctor.len(), 1);

        assert_eq!(EntryRepository::high_water_mark().await?, 3);

        Ok(())
    })
}

#[test]
fn duplicate_token_is_rejected() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        insert_tokens(1..=1).await?;
        let duplicate = QueueEntry::waiting(TokenNo(1), NewEntry::anonymous(), day());
        assert!(EntryRepository::insert(&duplicate).await.is_err());

        Ok(())
    })
}

#[test]
fn missing_entries_are_not_found() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        let missing = EntryRepository::get_by_token(TokenNo(42)).await;
        assert!(matches!(missing, Err(DbError::NotFound(_))));

        let ghost = walkin_core::EntryId::new();
        let update = EntryRepository::update_status(ghost, EntryStatus::Waiting, EntryStatus::Called).await;
        assert!(matches!(update, Err(DbError::NotFound(_))));

        assert_eq!(EntryRepository::high_water_mark().await?, 0);
        assert!(EntryRepository::first_waiting().await?.is_none());
        assert!(EntryRepository::latest_called().await?.is_none());

        Ok(())
    })
}

#[test]
fn update_status_is_compare_and_set() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        let entries = insert_tokens(1..=2).await?;
        let first = &entries[0];

        let called = EntryRepository::update_status(first.id, EntryStatus::Waiting, EntryStatus::Called).await?;
        assert_eq!(called.status, EntryStatus::Called);

        // A second caller still expecting `waiting` loses.
        let stale = EntryRepository::update_status(first.id, EntryStatus::Waiting, EntryStatus::Called).await;
        assert!(matches!(
            stale,
            Err(DbError::StatusConflict {
                actual: EntryStatus::Called,
                requested: EntryStatus::Called
            })
        ));

        let err: QueueError = stale.unwrap_err().into();
        assert!(matches!(err, QueueError::InvalidTransition { .. }));

        assert_eq!(
            EntryRepository::first_waiting().await?.map(|e| e.token_no),
            Some(TokenNo(2))
        );
        assert_eq!(
            EntryRepository::latest_called().await?.map(|e| e.token_no),
            Some(TokenNo(1))
        );

        Ok(())
    })
}

#[test]
fn counts_waiting_ahead_and_by_status() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        let entries = insert_tokens(1..=4).await?;
        EntryRepository::update_status(entries[1].id, EntryStatus::Waiting, EntryStatus::Called).await?;

        assert_eq!(EntryRepository::count_waiting_before(TokenNo(1)).await?, 0);
        // Token 2 was called and no longer counts toward the wait.
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(3)).await?, 1);
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(4)).await?, 2);
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(100)).await?, 3);

        let counts = EntryRepository::count_by_status().await?;
        assert_eq!(counts.get(&EntryStatus::Waiting).copied(), Some(3));
        assert_eq!(counts.get(&EntryStatus::Called).copied(), Some(1));
        assert_eq!(counts.get(&EntryStatus::Completed).copied(), None);

        Ok(())
    })
}

#[test]
fn clear_all_reports_removed_count() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        insert_tokens(1..=3).await?;
        assert_eq!(EntryRepository::clear_all().await?, 3);
        assert!(EntryRepository::list(EntryFilter::default()).await?.is_empty());
        assert_eq!(EntryRepository::clear_all().await?, 0);

        Ok(())
    })
}

#[test]
fn settings_singleton() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        assert_eq!(SettingsRepository::read().await?, None);
        let fallback = SettingsRepository::read_or(Settings::default()).await?;
        assert_eq!(fallback, Settings::default());

        let seeded = SettingsRepository::ensure(Settings::new(12.0)?).await?;
        assert_eq!(seeded.avg_service_time_minutes, 12.0);

        // ensure never overwrites an existing record
        let again = SettingsRepository::ensure(Settings::new(30.0)?).await?;
        assert_eq!(again.avg_service_time_minutes, 12.0);

        let written = SettingsRepository::write(Settings::new(7.5)?).await?;
        assert_eq!(written.avg_service_time_minutes, 7.5);
        assert_eq!(
            SettingsRepository::read().await?.map(|s| s.avg_service_time_minutes),
            Some(7.5)
        );

        Ok(())
    })
}

#[test]
fn reset_log_round_trip() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        assert_eq!(ResetLogRepository::last_reset_day().await?, None);

        ResetLogRepository::record_reset(day()).await?;
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day()));

        let next = day().succ_opt().unwrap();
        ResetLogRepository::record_reset(next).await?;
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(next));

        Ok(())
    })
}

#[test]
fn count_waiting_tracks_successive_calls() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        let entries = insert_tokens(1..=3).await?;
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(3)).await?, 2);

        EntryRepository::update_status(entries[0].id, EntryStatus::Waiting, EntryStatus::Called).await?;
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(3)).await?, 1);

        EntryRepository::update_status(entries[1].id, EntryStatus::Waiting, EntryStatus::Called).await?;
        assert_eq!(EntryRepository::count_waiting_before(TokenNo(3)).await?, 0);
        assert_eq!(EntryRepository::count_all().await?, 3);

        Ok(())
    })
}

#[test]
fn reset_day_clears_and_marks_together() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        insert_tokens(1..=3).await?;
        let next = day().succ_opt().unwrap();

        assert_eq!(ResetLogRepository::reset_day(next).await?, 3);
        assert!(EntryRepository::list(EntryFilter::default()).await?.is_empty());
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(next));

        Ok(())
    })
}

#[test]
fn failed_marker_write_keeps_entries() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;

        ResetLogRepository::record_reset(day()).await?;
        insert_tokens(1..=2).await?;

        common::break_reset_log().await?;
        let next = day().succ_opt().unwrap();
        let result = ResetLogRepository::reset_day(next).await;
        common::restore_reset_log().await?;

        assert!(result.is_err());
        assert_eq!(EntryRepository::count_all().await?, 2);
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day()));

        Ok(())
    })
}
