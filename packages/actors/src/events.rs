//! Fan-out of queue events to dashboards and token displays.

use tokio::sync::broadcast;
use walkin_core::QueueEvent;

/// Publish/subscribe channel for queue events.
///
/// Publishing never waits on subscribers: a receiver that falls more than
/// `capacity` events behind loses the oldest ones and sees `Lagged`.
/// Subscribers only receive events published after they subscribed.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QueueEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Deliver `event` to every current subscriber. Returns how many received it.
    pub fn publish(&self, event: QueueEvent) -> usize {
        tracing::trace!("Publishing {}", event.description());
        // No subscribers is not an error.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QueueEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::broadcast::error::{RecvError, TryRecvError};
    use walkin_core::TokenNo;

    #[test]
    fn publish_without_subscribers_is_fine() {
        let bus = EventBus::new(4);
        assert_eq!(bus.publish(QueueEvent::queue_update()), 0);
    }

    #[test]
    fn late_subscribers_get_no_backlog() {
        let bus = EventBus::new(4);
        let mut early = bus.subscribe();
        bus.publish(QueueEvent::call_update(TokenNo(1)));

        let mut late = bus.subscribe();
        assert!(matches!(late.try_recv(), Err(TryRecvError::Empty)));
        assert_eq!(early.try_recv().ok().and_then(|e| e.token_no()), Some(TokenNo(1)));
    }

    #[tokio::test]
    async fn slow_subscriber_never_blocks_publish() {
        let bus = EventBus::new(2);
        let mut slow = bus.subscribe();

        for n in 1..=10 {
            assert_eq!(bus.publish(QueueEvent::call_update(TokenNo(n))), 1);
        }

        assert!(matches!(slow.recv().await, Err(RecvError::Lagged(_))));
        let next = slow.recv().await.ok().and_then(|e| e.token_no());
        assert_eq!(next, Some(TokenNo(9)));
    }

    #[test]
    fn dropped_subscriber_is_forgotten() {
        let bus = EventBus::new(4);
        let sub = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);
        drop(sub);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(QueueEvent::queue_update()), 0);
    }
}
