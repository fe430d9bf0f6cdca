//! Walk-in actor: the queue state machine.
//!
//! Token issuance, call-next and the daily clear each run to completion
//! inside one message handler, so they never interleave with each other.
//! The actor also owns the operating day: every mutation first rolls the
//! queue over if the calendar has moved past the last reset.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use db::repositories::{EntryRepository, ResetLogRepository};
use ractor::{Actor, ActorProcessingErr, ActorRef, RpcReplyPort};
use walkin_core::{
    EntryStatus, NewEntry, QueueEntry, QueueError, QueueEvent, QueueResult, TokenNo,
};

use crate::clock::Clock;
use crate::config::WalkInConfig;
use crate::events::EventBus;
use crate::messages::WalkInMessage;
use crate::reset::ResetState;
use crate::sequencer::TokenSequencer;
use crate::store::bounded;

/// Walk-in actor arguments.
pub struct WalkInArgs {
    pub config: Arc<WalkInConfig>,
    pub events: EventBus,
    pub clock: Arc<dyn Clock>,
}

/// State for the walk-in actor.
pub struct WalkInState {
    sequencer: TokenSequencer,
    day: ResetState,
    /// First operating day whose marker still has to be written.
    unrecorded: Option<NaiveDate>,
    events: EventBus,
    clock: Arc<dyn Clock>,
    store_timeout: Duration,
}

impl WalkInState {
    /// Create a new state with an unsynced sequencer.
    pub fn new(args: WalkInArgs) -> Self {
        Self {
            sequencer: TokenSequencer::unsynced(),
            day: ResetState::default(),
            unrecorded: None,
            events: args.events,
            clock: args.clock,
            store_timeout: args.config.store_timeout(),
        }
    }

    /// Seed the sequencer from the store's highest token.
    async fn sync_sequencer(&mut self) -> QueueResult<()> {
        let high_water = bounded(self.store_timeout, EntryRepository::high_water_mark()).await?;
        self.sequencer.seed(high_water);
        tracing::info!("Token sequence resumed after {}", high_water);
        Ok(())
    }

    /// Load the reset marker. A store with no marker adopts today without clearing.
    async fn load_marker(&mut self, today: NaiveDate) -> QueueResult<()> {
        match bounded(self.store_timeout, ResetLogRepository::last_reset_day()).await? {
            Some(day) => {
                tracing::info!("Last queue reset was for {}", day);
                self.day.mark_reset(day);
            }
            None => {
                tracing::info!("No reset recorded yet, starting operating day {}", today);
                self.day.mark_reset(today);
                self.unrecorded = Some(today);
            }
        }
        Ok(())
    }

    /// Clear the queue if the calendar has moved past the last reset day.
    ///
    /// The clear and the new marker are committed together. Returns how many
    /// entries were removed, or `None` when no reset was due.
    async fn roll_over(&mut self) -> QueueResult<Option<u64>> {
        let today = self.clock.today();

        if !self.day.is_known() {
            self.load_marker(today).await?;
        }

        if self.day.is_due(today) {
            return match bounded(self.store_timeout, ResetLogRepository::reset_day(today)).await {
                Ok(removed) => {
                    self.day.mark_reset(today);
                    self.unrecorded = None;
                    self.sequencer.reset();
                    tracing::info!("Operating day {} started, removed {} entries", today, removed);
                    self.events.publish(QueueEvent::queue_update());
                    Ok(Some(removed))
                }
                Err(e) => {
                    // A timed-out transaction may still commit.
                    self.day.forget();
                    self.sequencer.invalidate();
                    tracing::warn!("Reset for {} failed: {}", today, e);
                    Err(e)
                }
            };
        }

        if let Some(day) = self.unrecorded {
            match bounded(self.store_timeout, ResetLogRepository::record_reset(day)).await {
                Ok(()) => self.unrecorded = None,
                Err(e) => tracing::warn!("Could not record operating day {}: {}", day, e),
            }
        }

        Ok(None)
    }

    /// Day the queue currently belongs to.
    fn operating_day(&self) -> NaiveDate {
        self.day
            .last_reset_day()
            .unwrap_or_else(|| self.clock.today())
    }

    async fn enqueue(&mut self, request: NewEntry) -> QueueResult<QueueEntry> {
        self.roll_over().await?;

        if !self.sequencer.is_synced() {
            self.sync_sequencer().await?;
        }

        let token = self
            .sequencer
            .next()
            .ok_or_else(|| QueueError::store("token sequence exhausted"))?;
        let entry = QueueEntry::waiting(token, request, self.operating_day());

        match bounded(self.store_timeout, EntryRepository::insert(&entry)).await {
            Ok(saved) => {
                tracing::debug!("Issued token {}", saved.token_no);
                self.events.publish(QueueEvent::queue_update());
                Ok(saved)
            }
            Err(e) => {
                // The insert may have landed even though we saw an error.
                self.sequencer.invalidate();
                tracing::warn!("Failed to insert token {}: {}", token, e);
                Err(e)
            }
        }
    }

    async fn call_next(&mut self) -> QueueResult<Option<QueueEntry>> {
        self.roll_over().await?;

        let Some(entry) = bounded(self.store_timeout, EntryRepository::first_waiting()).await?
        else {
            return Ok(None);
        };

        let next = entry.status.transition(EntryStatus::Called)?;
        let called = bounded(
            self.store_timeout,
            EntryRepository::update_status(entry.id, entry.status, next),
        )
        .await?;

        tracing::info!("Called token {}", called.token_no);
        self.events.publish(QueueEvent::queue_update());
        self.events.publish(QueueEvent::call_update(called.token_no));

        Ok(Some(called))
    }

    async fn transition(&mut self, token_no: TokenNo, to: EntryStatus) -> QueueResult<QueueEntry> {
        if to == EntryStatus::Called {
            return Err(QueueError::validation(
                "tokens are called in order through call-next",
            ));
        }

        self.roll_over().await?;

        let entry = bounded(self.store_timeout, EntryRepository::get_by_token(token_no)).await?;
        let next = entry.status.transition(to)?;
        let updated = bounded(
            self.store_timeout,
            EntryRepository::update_status(entry.id, entry.status, next),
        )
        .await?;

        tracing::info!("Token {} -> {}", token_no, next);
        self.events.publish(QueueEvent::queue_update());

        Ok(updated)
    }

    async fn clear_day(&mut self) -> QueueResult<u64> {
        let removed = match bounded(self.store_timeout, EntryRepository::clear_all()).await {
            Ok(removed) => removed,
            Err(e) => {
                self.sequencer.invalidate();
                return Err(e);
            }
        };
        self.sequencer.reset();

        tracing::info!("Queue cleared: removed {} entries", removed);
        self.events.publish(QueueEvent::queue_update());

        Ok(removed)
    }
}

/// Whether the caller already gave up waiting for this reply.
fn abandoned<T>(reply: &RpcReplyPort<T>) -> bool {
    if reply.is_closed() {
        tracing::debug!("Caller stopped waiting, dropping request");
        return true;
    }
    false
}

/// Actor that owns the walk-in queue's mutable state.
pub struct WalkInActor;

impl Actor for WalkInActor {
    type Msg = WalkInMessage;
    type State = WalkInState;
    type Arguments = WalkInArgs;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!("Starting walk-in actor");

        let mut state = WalkInState::new(args);
        if let Err(e) = state.sync_sequencer().await {
            // Retried on the first enqueue.
            tracing::warn!("Could not read token high-water mark: {}", e);
        }

        Ok(state)
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            WalkInMessage::Enqueue { request, reply } => {
                if !abandoned(&reply) {
                    let _ = reply.send(state.enqueue(request).await);
                }
            }

            WalkInMessage::CallNext { reply } => {
                if !abandoned(&reply) {
                    let _ = reply.send(state.call_next().await);
                }
            }

            WalkInMessage::Transition {
                token_no,
                to,
                reply,
            } => {
                if !abandoned(&reply) {
                    let _ = reply.send(state.transition(token_no, to).await);
                }
            }

            WalkInMessage::ClearDay { reply } => {
                if !abandoned(&reply) {
                    let _ = reply.send(state.clear_day().await);
                }
            }

            WalkInMessage::RollOver { reply } => {
                if !abandoned(&reply) {
                    let _ = reply.send(state.roll_over().await);
                }
            }

            WalkInMessage::OperatingDay { reply } => {
                let _ = reply.send(Ok(state.day.last_reset_day()));
            }

            WalkInMessage::Shutdown => {
                tracing::info!("Shutting down walk-in actor");
                myself.stop(None);
            }
        }

        Ok(())
    }
}
