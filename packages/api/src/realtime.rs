//! Real-time event streaming via Server-Sent Events.

use tokio::sync::broadcast;
use walkin_core::QueueEvent;

/// Subscribe to queue events published from now on.
pub async fn subscribe_events() -> Result<broadcast::Receiver<QueueEvent>, dioxus::prelude::ServerFnError> {
    Ok(crate::walk_in().await?.subscribe())
}

/// JSON payload sent as the `data:` line of an SSE message.
pub fn sse_data(event: &QueueEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|_| "{}".to_string())
}
