//! Bounded access to the queue store.

use std::future::Future;
use std::time::Duration;

use db::DbError;
use walkin_core::{QueueError, QueueResult};

/// Run a store call, failing with `StoreUnavailable` if it takes longer than `limit`.
pub(crate) async fn bounded<T>(
    limit: Duration,
    call: impl Future<Output = Result<T, DbError>>,
) -> QueueResult<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result.map_err(QueueError::from),
        Err(_) => Err(QueueError::store(format!(
            "store did not answer within {}ms",
            limit.as_millis()
        ))),
    }
}
