//! Server initialization for the walk-in queue.

use std::sync::{Arc, LazyLock, OnceLock};

use actors::{LocalClock, StartError, WalkInHandle, WalkInSystem, global_registry, start_walk_in};
use db::DbError;
use dioxus::prelude::ServerFnError;
use tokio::sync::{Mutex, OnceCell};
use walkin_core::QueueError;

use crate::auth::StaffAuth;
use crate::config::{ConfigError, ServerConfig};

/// Errors raised while bringing the walk-in queue up.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error(transparent)]
    Start(#[from] StartError),
}

static INIT: OnceCell<()> = OnceCell::const_new();
static SYSTEM: LazyLock<Mutex<Option<WalkInSystem>>> = LazyLock::new(|| Mutex::new(None));
static STAFF: OnceLock<StaffAuth> = OnceLock::new();

/// Initialize the walk-in queue with an explicit configuration.
///
/// Only the first successful call has any effect.
pub async fn init_walk_in(config: ServerConfig) -> Result<(), InitError> {
    INIT.get_or_try_init(|| start(config)).await?;
    Ok(())
}

/// Initialize from the environment unless already running.
pub async fn ensure_initialized() -> Result<(), InitError> {
    if INIT.initialized() {
        return Ok(());
    }
    init_walk_in(ServerConfig::from_env()?).await
}

async fn start(config: ServerConfig) -> Result<(), InitError> {
    tracing::info!("Initializing walk-in queue...");

    db::init(config.db).await?;

    let system = start_walk_in(config.walk_in, Arc::new(LocalClock)).await?;
    global_registry().register(system.handle().clone());
    let _ = STAFF.set(config.staff);
    *SYSTEM.lock().await = Some(system);

    tracing::info!("Walk-in queue initialized");
    Ok(())
}

/// Stop the walk-in actors, letting queued requests finish first.
pub async fn shutdown_walk_in() {
    global_registry().take();
    if let Some(system) = SYSTEM.lock().await.take() {
        system.shutdown().await;
    }
}

/// Handle to the running walk-in queue, starting it on first use.
pub async fn walk_in() -> Result<WalkInHandle, ServerFnError> {
    ensure_initialized()
        .await
        .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

    global_registry()
        .get()
        .ok_or_else(|| ServerFnError::new("Walk-in queue not available"))
}

/// Reject requests that do not carry a valid staff session.
pub async fn verify_staff(token: &str) -> Result<(), ServerFnError> {
    ensure_initialized()
        .await
        .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

    let staff = STAFF
        .get()
        .ok_or_else(|| ServerFnError::new("Staff login not configured"))?;

    staff.verify(token).map(|_| ()).map_err(|e| {
        tracing::debug!("Rejected staff request: {}", e);
        ServerFnError::new(format!("Unauthorized: {}", e))
    })
}

/// Staff credential check, for the login server function.
pub(crate) async fn staff_auth() -> Result<&'static StaffAuth, ServerFnError> {
    ensure_initialized()
        .await
        .map_err(|e| ServerFnError::new(format!("Initialization failed: {}", e)))?;

    STAFF
        .get()
        .ok_or_else(|| ServerFnError::new("Staff login not configured"))
}

/// Translate a queue error into the server function error shown to callers.
pub fn queue_error(err: QueueError) -> ServerFnError {
    if err.is_server_failure() {
        tracing::warn!("Walk-in request failed: {}", err);
    }
    ServerFnError::new(err.to_string())
}
