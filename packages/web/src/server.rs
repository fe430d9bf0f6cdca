//! Server setup: logging, queue startup and the SSE route.

use std::convert::Infallible;
use std::sync::Once;

use axum::Router;
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::get;
use futures_util::{Stream, StreamExt};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tracing_subscriber::EnvFilter;
use walkin_core::QueueEvent;

use crate::App;

/// Log at INFO unless `RUST_LOG` says otherwise.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Start the walk-in queue and build the router serving the app, its server
/// functions and the event stream.
pub async fn router() -> Result<Router, api::InitError> {
    api::ensure_initialized().await?;
    stop_on_ctrl_c();

    Ok(dioxus::server::router(App).route("/api/events", get(events)))
}

/// Let the walk-in actor finish queued requests before the process exits.
fn stop_on_ctrl_c() {
    static LISTENER: Once = Once::new();
    LISTENER.call_once(|| {
        tokio::spawn(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutting down walk-in queue...");
                api::shutdown_walk_in().await;
                std::process::exit(0);
            }
        });
    });
}

fn to_sse(event: &QueueEvent) -> Event {
    Event::default().event(event.name()).data(api::sse_data(event))
}

/// Stream queue events to a dashboard or token display.
async fn events() -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, (StatusCode, String)> {
    let rx = api::subscribe_events()
        .await
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;

    let stream = BroadcastStream::new(rx).map(|item| {
        let event = match item {
            Ok(event) => event,
            // Missed events only ever mean "re-fetch".
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                tracing::debug!("Event subscriber lagged by {} events", skipped);
                QueueEvent::queue_update()
            }
        };
        Ok(to_sse(&event))
    });

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
