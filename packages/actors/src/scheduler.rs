//! Reset scheduler: asks the walk-in actor to roll over once per operating day.

use std::time::Duration;

use ractor::{Actor, ActorProcessingErr, ActorRef};
use tokio::time::MissedTickBehavior;

use crate::handle::WalkInHandle;
use crate::messages::SchedulerMessage;

/// Scheduler arguments.
pub struct SchedulerArgs {
    pub walk_in: WalkInHandle,
    pub interval: Duration,
}

/// State for the scheduler actor.
pub struct SchedulerState {
    walk_in: WalkInHandle,
}

impl SchedulerState {
    async fn check(&self) {
        match self.walk_in.roll_over().await {
            Ok(Some(removed)) => {
                tracing::info!("Daily reset removed {} entries", removed);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!("Daily reset failed, retrying next tick: {}", e),
        }
    }
}

/// Actor that triggers the end-of-day clear.
///
/// The clear itself runs inside the walk-in actor, which also rolls the day
/// over on its own when a mutation arrives before the next tick.
pub struct ResetScheduler;

impl Actor for ResetScheduler {
    type Msg = SchedulerMessage;
    type State = SchedulerState;
    type Arguments = SchedulerArgs;

    async fn pre_start(
        &self,
        myself: ActorRef<Self::Msg>,
        args: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        tracing::info!(
            "Starting reset scheduler, checking every {}s",
            args.interval.as_secs()
        );

        // Start periodic tick; ends once the scheduler stops accepting messages.
        let myself_clone = myself.clone();
        let period = args.interval;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if myself_clone.send_message(SchedulerMessage::Tick).is_err() {
                    break;
                }
            }
        });

        Ok(SchedulerState {
            walk_in: args.walk_in,
        })
    }

    async fn handle(
        &self,
        myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        match message {
            SchedulerMessage::Tick => state.check().await,

            SchedulerMessage::LastResetDay { reply } => {
                // Answered after any tick queued before it.
                let day = state.walk_in.operating_day().await.ok().flatten();
                let _ = reply.send(day);
            }

            SchedulerMessage::Shutdown => {
                tracing::info!("Shutting down reset scheduler");
                myself.stop(None);
            }
        }

        Ok(())
    }
}
