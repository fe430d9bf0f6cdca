//! Typed client for the walk-in queue.

use std::sync::Arc;

use chrono::NaiveDate;
use db::repositories::{EntryFilter, EntryRepository, SettingsRepository};
use ractor::{ActorRef, RpcReplyPort};
use tokio::sync::broadcast;
use walkin_core::{
    EntryStatus, NewEntry, QueueEntry, QueueError, QueueEvent, QueueResult, QueueSummary,
    Settings, TokenNo, estimate_wait_minutes,
};

use crate::config::WalkInConfig;
use crate::events::EventBus;
use crate::messages::WalkInMessage;
use crate::store::bounded;

/// Cheap-to-clone entry point for every walk-in queue operation.
///
/// Mutations are sent to the walk-in actor; read-only queries go straight
/// to the store so they never wait behind a mutation.
#[derive(Clone)]
pub struct WalkInHandle {
    actor: ActorRef<WalkInMessage>,
    events: EventBus,
    config: Arc<WalkInConfig>,
}

impl WalkInHandle {
    pub fn new(actor: ActorRef<WalkInMessage>, events: EventBus, config: Arc<WalkInConfig>) -> Self {
        Self {
            actor,
            events,
            config,
        }
    }

    /// Send a request to the actor and wait for its reply, bounded by the call timeout.
    async fn request<T>(
        &self,
        build: impl FnOnce(RpcReplyPort<QueueResult<T>>) -> WalkInMessage,
    ) -> QueueResult<T> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.actor
            .send_message(build(tx.into()))
            .map_err(|e| QueueError::store(format!("walk-in actor unavailable: {}", e)))?;

        match tokio::time::timeout(self.config.call_timeout(), rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(QueueError::store("walk-in actor dropped the request")),
            Err(_) => Err(QueueError::store("walk-in actor did not answer in time")),
        }
    }

    /// Issue the next token to a walk-in patient.
    pub async fn enqueue(&self, request: NewEntry) -> QueueResult<QueueEntry> {
        self.request(|reply| WalkInMessage::Enqueue { request, reply })
            .await
    }

    /// Call the lowest waiting token. `None` when nobody is waiting.
    pub async fn call_next(&self) -> QueueResult<Option<QueueEntry>> {
        self.request(|reply| WalkInMessage::CallNext { reply }).await
    }

    /// Mark a called token as served.
    pub async fn complete(&self, token_no: TokenNo) -> QueueResult<QueueEntry> {
        self.request(|reply| WalkInMessage::Transition {
            token_no,
            to: EntryStatus::Completed,
            reply,
        })
        .await
    }

    /// Mark a called token as a no-show.
    pub async fn skip(&self, token_no: TokenNo) -> QueueResult<QueueEntry> {
        self.request(|reply| WalkInMessage::Transition {
            token_no,
            to: EntryStatus::Skipped,
            reply,
        })
        .await
    }

    /// Remove every entry and restart numbering at 1. Returns how many entries were removed.
    pub async fn clear_day(&self) -> QueueResult<u64> {
        self.request(|reply| WalkInMessage::ClearDay { reply }).await
    }

    /// Clear the queue if the calendar has moved past the last reset.
    ///
    /// Returns how many entries were removed, or `None` when no reset was due.
    pub async fn roll_over(&self) -> QueueResult<Option<u64>> {
        self.request(|reply| WalkInMessage::RollOver { reply }).await
    }

    /// Operating day the queue belongs to, once the actor has loaded it.
    pub async fn operating_day(&self) -> QueueResult<Option<NaiveDate>> {
        self.request(|reply| WalkInMessage::OperatingDay { reply })
            .await
    }

    /// Token of the most recently called entry.
    pub async fn current_called(&self) -> QueueResult<Option<TokenNo>> {
        let latest = bounded(self.config.store_timeout(), EntryRepository::latest_called()).await?;
        Ok(latest.map(|entry| entry.token_no))
    }

    /// Every entry, by ascending token.
    pub async fn list_queue(&self) -> QueueResult<Vec<QueueEntry>> {
        bounded(
            self.config.store_timeout(),
            EntryRepository::list(EntryFilter::default()),
        )
        .await
    }

    /// Estimated wait in minutes for `token_no`.
    ///
    /// Counts waiting entries with a smaller token, whether or not `token_no`
    /// itself exists or is still waiting.
    pub async fn estimate(&self, token_no: TokenNo) -> QueueResult<f64> {
        let settings = self.settings().await?;
        let ahead = bounded(
            self.config.store_timeout(),
            EntryRepository::count_waiting_before(token_no),
        )
        .await?;
        Ok(estimate_wait_minutes(ahead, settings.avg_service_time_minutes))
    }

    /// Current settings, or the configured fallback when none are stored.
    pub async fn settings(&self) -> QueueResult<Settings> {
        bounded(
            self.config.store_timeout(),
            SettingsRepository::read_or(self.config.fallback_settings()),
        )
        .await
    }

    /// Replace the settings.
    pub async fn update_settings(&self, settings: Settings) -> QueueResult<Settings> {
        settings.validate()?;
        let saved = bounded(self.config.store_timeout(), SettingsRepository::write(settings)).await?;
        tracing::info!(
            "Average service time set to {} minutes",
            saved.avg_service_time_minutes
        );
        // Estimates shown on displays are now stale.
        self.events.publish(QueueEvent::queue_update());
        Ok(saved)
    }

    /// Counts per status and the token being served.
    pub async fn summary(&self) -> QueueResult<QueueSummary> {
        let counts = bounded(self.config.store_timeout(), EntryRepository::count_by_status()).await?;
        let count = |status: EntryStatus| counts.get(&status).copied().unwrap_or(0);

        Ok(QueueSummary {
            waiting: count(EntryStatus::Waiting),
            called: count(EntryStatus::Called),
            completed: count(EntryStatus::Completed),
            skipped: count(EntryStatus::Skipped),
            current_called: self.current_called().await?,
        })
    }

    /// Receive queue events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.events.subscribe()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn config(&self) -> &WalkInConfig {
        &self.config
    }

    /// Ask the actor to stop after the messages already queued.
    pub fn shutdown(&self) {
        let _ = self.actor.send_message(WalkInMessage::Shutdown);
    }
}
