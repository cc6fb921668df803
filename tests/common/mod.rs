#![allow(dead_code)]

use std::time::{SystemTime, UNIX_EPOCH};

use golf_league::storage::sql::drop_script;
use golf_league::storage::{SqlStorage, StorageError};
use sql_middleware::middleware::{ConfigAndPool, SqliteOptions};

pub const ADMIN: i64 = 1;
pub const BEN: i64 = 2;
pub const CAL: i64 = 3;
pub const DEE: i64 = 4;
pub const EVE: i64 = 5;

pub struct TestContext {
    pub storage: SqlStorage,
    pub db_name: String,
}

/// Fresh shared-cache in-memory database with the league schema and `fixture_sql` loaded.
pub async fn setup_test_context(fixture_sql: &str) -> Result<TestContext, StorageError> {
    let db_name = format!(
        "file:test_db_{}?mode=memory&cache=shared",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time went backwards")
            .as_nanos()
    );

    let config_and_pool = ConfigAndPool::new_sqlite(SqliteOptions::new(db_name.clone()))
        .await
        .map_err(StorageError::from)?;
    let storage = SqlStorage::new(config_and_pool);

    storage.execute_batch(drop_script()).await?;
    storage.create_schema().await?;
    if !fixture_sql.trim().is_empty() {
        storage.execute_batch(fixture_sql).await?;
    }

    Ok(TestContext { storage, db_name })
}

/// Gross scores with `value` on every hole of `holes`, 0 elsewhere.
pub fn gross_on(holes: std::ops::Range<usize>, value: i32) -> [i32; 18] {
    let mut gross = [0; 18];
    for i in holes {
        gross[i] = value;
    }
    gross
}
