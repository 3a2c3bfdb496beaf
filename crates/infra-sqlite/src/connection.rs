// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;
use waitlist_core::error::Result;

/// How long a writer waits for the database lock before giving up
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(2500);

const MAX_CONNECTIONS: u32 = 10;

/// Create SQLite connection pool with WAL mode and foreign keys enforced.
///
/// An in-memory database lives and dies with its connection, so it gets a
/// single connection that is never recycled.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    create_pool_with(database_url, DEFAULT_BUSY_TIMEOUT).await
}

/// Lock wait that leaves room for one retry inside `operation_timeout`
pub fn busy_timeout_for(operation_timeout: Duration) -> Duration {
    operation_timeout / 2
}

pub async fn create_pool_with(database_url: &str, busy_timeout: Duration) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(map_sqlx_error)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(busy_timeout)
        .foreign_keys(true)
        .create_if_missing(true);

    let pool_options = if is_in_memory(database_url) {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(MAX_CONNECTIONS)
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    debug!(
        database_url,
        busy_timeout_ms = busy_timeout.as_millis() as u64,
        "SQLite pool ready"
    );
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_pool() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        assert!(pool.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[tokio::test]
    async fn test_file_database_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waitlist.db");
        let pool = create_pool(path.to_str().unwrap()).await.unwrap();
        assert!(pool.acquire().await.is_ok());
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_busy_timeout_applied() {
        let pool = create_pool_with("sqlite::memory:", Duration::from_millis(1200))
            .await
            .unwrap();
        let busy_ms: i64 = sqlx::query_scalar("PRAGMA busy_timeout")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(busy_ms, 1200);
    }

    #[test]
    fn test_busy_timeout_fits_a_retry() {
        let operation = Duration::from_secs(5);
        assert_eq!(busy_timeout_for(operation), DEFAULT_BUSY_TIMEOUT);
        assert!(2 * busy_timeout_for(operation) <= operation);
    }

    #[test]
    fn test_in_memory_detection() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("file:waitlist?mode=memory&cache=shared"));
        assert!(!is_in_memory("/var/lib/waitlist/waitlist.db"));
    }
}
