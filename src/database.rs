use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::time::Duration;

use crate::store::StoreError;

pub type Database = Pool<Sqlite>;

pub async fn create_database_pool(database_url: &str) -> Result<Database, StoreError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    // Test the connection
    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    log::info!("connected to {} and applied migrations", database_url);
    Ok(pool)
}

/// Single-connection in-memory database with the schema applied.
///
/// The pool must never recycle its connection: a fresh `sqlite::memory:`
/// connection is an empty database.
#[cfg(test)]
pub async fn memory_database() -> Database {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory sqlite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("apply migrations");

    pool
}
