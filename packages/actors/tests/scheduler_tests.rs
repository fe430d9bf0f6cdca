#![allow(clippy::disallowed_methods)]

mod common;

use actors::ManualClock;
use common::{TestResult, day, start};
use db::repositories::ResetLogRepository;
use walkin_core::{NewEntry, TokenNo};

#[test]
fn test_first_start_records_today_without_clearing() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;
        let clock = ManualClock::new(day(18));
        let system = start(&clock).await?;

        system.handle().enqueue(NewEntry::anonymous()).await?;
        system.handle().enqueue(NewEntry::anonymous()).await?;

        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(18)));
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day(18)));
        assert_eq!(system.handle().list_queue().await?.len(), 2);

        system.shutdown().await;
        Ok(())
    })
}

#[test]
fn test_day_change_clears_exactly_once() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;
        let clock = ManualClock::new(day(18));
        let system = start(&clock).await?;
        let queue = system.handle();

        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(18)));

        for _ in 0..3 {
            queue.enqueue(NewEntry::anonymous()).await?;
        }
        queue.call_next().await?;

        clock.advance_day();
        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(19)));
        assert!(queue.list_queue().await?.is_empty());
        assert_eq!(queue.current_called().await?, None);
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day(19)));

        // Patients arriving after midnight survive later checks on the same day.
        let entry = queue.enqueue(NewEntry::anonymous()).await?;
        assert_eq!(entry.token_no, TokenNo::FIRST);
        assert_eq!(entry.operating_day, day(19));

        system.check_reset();
        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(19)));
        assert_eq!(queue.list_queue().await?.len(), 1);

        system.shutdown().await;
        Ok(())
    })
}

#[test]
fn test_persisted_marker_survives_restart() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;
        ResetLogRepository::record_reset(day(17)).await?;
        let clock = ManualClock::new(day(17));

        let first = start(&clock).await?;
        first.handle().enqueue(NewEntry::anonymous()).await?;
        first.check_reset();
        assert_eq!(first.last_reset_day().await, Some(day(17)));
        first.shutdown().await;

        // Restarting on the same day keeps the queue.
        let second = start(&clock).await?;
        second.check_reset();
        assert_eq!(second.last_reset_day().await, Some(day(17)));
        assert_eq!(second.handle().list_queue().await?.len(), 1);
        second.shutdown().await;

        // Starting after the day has turned clears the leftovers.
        clock.set(day(18));
        let third = start(&clock).await?;
        third.check_reset();
        assert_eq!(third.last_reset_day().await, Some(day(18)));
        assert!(third.handle().list_queue().await?.is_empty());
        third.shutdown().await;

        Ok(())
    })
}

#[test]
fn test_failed_reset_keeps_queue_and_marker() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;
        let clock = ManualClock::new(day(18));
        let system = start(&clock).await?;
        let queue = system.handle();

        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(18)));
        for _ in 0..3 {
            queue.enqueue(NewEntry::anonymous()).await?;
        }

        // The clear and the marker share a transaction, so neither lands.
        common::break_reset_log().await?;
        clock.advance_day();
        system.check_reset();
        let rejected = queue.enqueue(NewEntry::anonymous()).await;
        assert_eq!(queue.list_queue().await?.len(), 3);
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day(18)));
        assert!(rejected.is_err());

        common::restore_reset_log().await?;
        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(19)));
        assert!(queue.list_queue().await?.is_empty());
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day(19)));

        queue.enqueue(NewEntry::anonymous()).await?;
        queue.enqueue(NewEntry::anonymous()).await?;
        system.shutdown().await;

        // A restart later the same day keeps today's patients.
        let restarted = start(&clock).await?;
        restarted.check_reset();
        assert_eq!(restarted.last_reset_day().await, Some(day(19)));
        assert_eq!(restarted.handle().list_queue().await?.len(), 2);
        let entry = restarted.handle().enqueue(NewEntry::anonymous()).await?;
        assert_eq!(entry.token_no, TokenNo(3));

        restarted.shutdown().await;
        Ok(())
    })
}

#[test]
fn test_enqueue_after_midnight_rolls_over_before_the_tick() -> TestResult {
    common::run(async {
        let _guard = common::setup_db().await?;
        let clock = ManualClock::new(day(18));
        let system = start(&clock).await?;
        let queue = system.handle();

        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(18)));
        for _ in 0..3 {
            queue.enqueue(NewEntry::anonymous()).await?;
        }

        // No tick has run since midnight.
        clock.advance_day();
        let entry = queue.enqueue(NewEntry::anonymous()).await?;
        assert_eq!(entry.token_no, TokenNo::FIRST);
        assert_eq!(entry.operating_day, day(19));
        assert_eq!(queue.list_queue().await?.len(), 1);
        assert_eq!(ResetLogRepository::last_reset_day().await?, Some(day(19)));

        // The late tick finds nothing left to clear.
        system.check_reset();
        assert_eq!(system.last_reset_day().await, Some(day(19)));
        assert_eq!(queue.list_queue().await?.len(), 1);

        system.shutdown().await;
        Ok(())
    })
}
