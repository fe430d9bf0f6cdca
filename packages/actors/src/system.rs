//! Startup and shutdown of the walk-in actors.

use std::sync::Arc;

use chrono::NaiveDate;
use db::repositories::SettingsRepository;
use ractor::{Actor, ActorRef, SpawnErr};
use tokio::task::JoinHandle;
use walkin_core::QueueError;

use crate::clock::Clock;
use crate::config::WalkInConfig;
use crate::events::EventBus;
use crate::handle::WalkInHandle;
use crate::messages::SchedulerMessage;
use crate::scheduler::{ResetScheduler, SchedulerArgs};
use crate::store::bounded;
use crate::walkin_actor::{WalkInActor, WalkInArgs};

/// Errors raised while starting the walk-in actors.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Failed to spawn actor: {0}")]
    Spawn(#[from] SpawnErr),

    #[error("Failed to prepare store: {0}")]
    Store(#[from] QueueError),
}

/// Running walk-in actor and its reset scheduler.
pub struct WalkInSystem {
    handle: WalkInHandle,
    scheduler: ActorRef<SchedulerMessage>,
    walk_in_task: JoinHandle<()>,
    scheduler_task: JoinHandle<()>,
}

impl WalkInSystem {
    pub fn handle(&self) -> &WalkInHandle {
        &self.handle
    }

    pub fn scheduler(&self) -> &ActorRef<SchedulerMessage> {
        &self.scheduler
    }

    /// Run a calendar check now instead of waiting for the next tick.
    pub fn check_reset(&self) {
        let _ = self.scheduler.send_message(SchedulerMessage::Tick);
    }

    /// Day of the last reset, after any check already requested.
    pub async fn last_reset_day(&self) -> Option<NaiveDate> {
        let (tx, rx) = ractor::concurrency::oneshot();
        self.scheduler
            .send_message(SchedulerMessage::LastResetDay { reply: tx.into() })
            .ok()?;
        tokio::time::timeout(self.handle.config().call_timeout(), rx)
            .await
            .ok()?
            .ok()?
    }

    /// Stop the scheduler, then let the walk-in actor drain its mailbox and stop.
    pub async fn shutdown(self) {
        let _ = self.scheduler.send_message(SchedulerMessage::Shutdown);
        let _ = self.scheduler_task.await;

        self.handle.shutdown();
        let _ = self.walk_in_task.await;

        tracing::info!("Walk-in queue stopped");
    }
}

/// Start the walk-in actor and reset scheduler on an initialized database.
///
/// Seeds the settings record with the configured fallback when it is missing.
pub async fn start_walk_in(
    config: WalkInConfig,
    clock: Arc<dyn Clock>,
) -> Result<WalkInSystem, StartError> {
    let config = Arc::new(config);

    let settings = bounded(
        config.store_timeout(),
        SettingsRepository::ensure(config.fallback_settings()),
    )
    .await?;
    tracing::info!(
        "Average service time is {} minutes",
        settings.avg_service_time_minutes
    );

    let events = EventBus::new(config.event_capacity);

    // Unnamed so several systems can coexist in one process.
    let (actor, walk_in_task) = Actor::spawn(
        None,
        WalkInActor,
        WalkInArgs {
            config: config.clone(),
            events: events.clone(),
            clock,
        },
    )
    .await?;
    let handle = WalkInHandle::new(actor, events, config.clone());

    let scheduler_args = SchedulerArgs {
        walk_in: handle.clone(),
        interval: config.reset_check_interval(),
    };
    let (scheduler, scheduler_task) = match Actor::spawn(None, ResetScheduler, scheduler_args).await {
        Ok(spawned) => spawned,
        Err(e) => {
            handle.shutdown();
            return Err(e.into());
        }
    };

    Ok(WalkInSystem {
        handle,
        scheduler,
        walk_in_task,
        scheduler_task,
    })
}
