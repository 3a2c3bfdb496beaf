//! Shared fixtures: a Queue Service over a real SQLite database

#![allow(dead_code)]

use sqlx::SqlitePool;
use std::sync::Arc;
use tempfile::TempDir;
use waitlist_core::application::{CreateQueueRequest, QueuePolicy, QueueService};
use waitlist_core::domain::{Caller, QueueId, QueueParticipant, UserId};
use waitlist_core::port::ManualTimeProvider;
use waitlist_infra_sqlite::{
    create_pool, run_migrations, SqliteParticipantLedger, SqliteQueueRepository,
};

pub const NOW: i64 = 1_700_000_000_000;

pub const ADMIN: Caller = Caller {
    user_id: 1,
    is_admin: true,
};

pub struct Fixture {
    pub service: Arc<QueueService>,
    pub clock: Arc<ManualTimeProvider>,
    pub pool: SqlitePool,
    // Keeps a file database alive for the fixture's lifetime
    _dir: Option<TempDir>,
}

impl Fixture {
    /// Single-connection in-memory database
    pub async fn in_memory() -> Self {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        Self::build(pool, None).await
    }

    /// File database with a multi-connection pool, for concurrency tests
    pub async fn on_disk() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("waitlist.db").display());
        let pool = create_pool(&url).await.unwrap();
        Self::build(pool, Some(dir)).await
    }

    async fn build(pool: SqlitePool, dir: Option<TempDir>) -> Self {
        run_migrations(&pool).await.unwrap();
        let clock = Arc::new(ManualTimeProvider::new(NOW));
        let service = Arc::new(QueueService::new(
            Arc::new(SqliteQueueRepository::new(pool.clone())),
            Arc::new(SqliteParticipantLedger::new(pool.clone())),
            clock.clone(),
            QueuePolicy::default(),
        ));
        Self {
            service,
            clock,
            pool,
            _dir: dir,
        }
    }

    pub async fn new_queue(&self) -> QueueId {
        self.service
            .create_queue(&ADMIN, CreateQueueRequest::default())
            .await
            .unwrap()
    }

    /// Active (user, position) pairs in queue order
    pub async fn order(&self, queue_id: QueueId) -> Vec<(UserId, i64)> {
        self.active(queue_id)
            .await
            .iter()
            .map(|p| (p.user_id, p.position))
            .collect()
    }

    pub async fn active(&self, queue_id: QueueId) -> Vec<QueueParticipant> {
        self.service.participants(queue_id).await.unwrap()
    }
}
