#![allow(dead_code)]

use std::error::Error;
use std::future::Future;
use std::sync::LazyLock;

use tokio::runtime::Runtime;
use tokio::sync::{Mutex, MutexGuard};

use db::{DbConfig, DbError};

pub type TestResult = Result<(), Box<dyn Error>>;

// The database handle is global and its connection task lives on the runtime
// that opened it, so every test shares one runtime.
static RUNTIME: LazyLock<Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap()
});

static TEST_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub fn run(test: impl Future<Output = TestResult>) -> TestResult {
    RUNTIME.block_on(test)
}

pub async fn setup_db() -> Result<MutexGuard<'static, ()>, DbError> {
    let guard = TEST_LOCK.lock().await;
    db::init(DbConfig::memory()).await?;
    let db_conn = db::get_db()?;
    db_conn
        .query("DELETE walkin_entry; DELETE settings; DELETE reset_log;")
        .await?
        .check()?;
    restore_reset_log().await?;
    Ok(guard)
}

/// Make every write of the reset marker fail.
pub async fn break_reset_log() -> Result<(), DbError> {
    db::get_db()?
        .query("DEFINE FIELD OVERWRITE last_reset_day ON reset_log TYPE string ASSERT false;")
        .await?
        .check()?;
    Ok(())
}

pub async fn restore_reset_log() -> Result<(), DbError> {
    db::get_db()?
        .query("DEFINE FIELD OVERWRITE last_reset_day ON reset_log TYPE string;")
        .await?
        .check()?;
    Ok(())
}
