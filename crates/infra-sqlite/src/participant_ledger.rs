// SQLite ParticipantLedger Implementation

use crate::error::map_sqlx_error;
use crate::SqliteLedgerTransaction;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitlist_core::domain::{Position, QueueId, QueueParticipant, UserId};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::{LedgerTransaction, ParticipantLedger};

pub struct SqliteParticipantLedger {
    pool: SqlitePool,
}

impl SqliteParticipantLedger {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn not_in_queue(queue_id: QueueId, user_id: UserId) -> AppError {
    AppError::NotFound(format!("User {} not found in queue {}", user_id, queue_id))
}

#[async_trait]
impl ParticipantLedger for SqliteParticipantLedger {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteLedgerTransaction::new(tx)))
    }

    async fn deactivate(&self, queue_id: QueueId, user_id: UserId) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE queue_participants
            SET is_active = 0
            WHERE queue_id = ? AND user_id = ? AND is_active = 1
            "#,
        )
        .bind(queue_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(not_in_queue(queue_id, user_id));
        }
        Ok(())
    }

    async fn list_active(&self, queue_id: QueueId) -> Result<Vec<QueueParticipant>> {
        let rows: Vec<ParticipantRow> = sqlx::query_as(
            r#"
            SELECT id, queue_id, user_id, position, joined_at, is_active
            FROM queue_participants
            WHERE queue_id = ? AND is_active = 1
            ORDER BY position ASC
            "#,
        )
        .bind(queue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ParticipantRow::into_participant).collect())
    }

    async fn position_of(&self, queue_id: QueueId, user_id: UserId) -> Result<Position> {
        let position: Option<Position> = sqlx::query_scalar(
            r#"
            SELECT position FROM queue_participants
            WHERE queue_id = ? AND user_id = ? AND is_active = 1
            "#,
        )
        .bind(queue_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        position.ok_or_else(|| not_in_queue(queue_id, user_id))
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct ParticipantRow {
    id: i64,
    queue_id: i64,
    user_id: i64,
    position: i64,
    joined_at: i64,
    is_active: bool,
}

impl ParticipantRow {
    fn into_participant(self) -> QueueParticipant {
        QueueParticipant {
            id: self.id,
            queue_id: self.queue_id,
            user_id: self.user_id,
            position: self.position,
            joined_at: self.joined_at,
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};

    async fn setup_test_db() -> (SqlitePool, QueueId) {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let queue_id: QueueId = sqlx::query_scalar(
            "INSERT INTO queues (title, time_start, time_end) VALUES ('q', 0, 1000) RETURNING id",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        (pool, queue_id)
    }

    async fn join(ledger: &SqliteParticipantLedger, queue_id: QueueId, user_id: UserId) -> Position {
        let mut tx = ledger.begin().await.unwrap();
        assert!(tx.lock_queue(queue_id).await.unwrap());
        let position = tx.next_position(queue_id).await.unwrap();
        tx.insert(queue_id, user_id, position, 0).await.unwrap();
        tx.commit().await.unwrap();
        position
    }

    #[tokio::test]
    async fn test_next_position_starts_at_one() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);

        let mut tx = ledger.begin().await.unwrap();
        assert_eq!(tx.next_position(queue_id).await.unwrap(), 1);
        tx.rollback().await.unwrap();

        assert_eq!(join(&ledger, queue_id, 10).await, 1);
        assert_eq!(join(&ledger, queue_id, 11).await, 2);
    }

    #[tokio::test]
    async fn test_lock_queue_reports_missing_queue() {
        let (pool, _) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);

        let mut tx = ledger.begin().await.unwrap();
        assert!(!tx.lock_queue(9999).await.unwrap());
    }

    #[tokio::test]
    async fn test_deactivate_uses_affected_rows() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);
        join(&ledger, queue_id, 10).await;

        ledger.deactivate(queue_id, 10).await.unwrap();
        let err = ledger.deactivate(queue_id, 10).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(err.to_string().contains("not found in queue"));
    }

    #[tokio::test]
    async fn test_deactivated_row_is_kept_as_history() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool.clone());
        join(&ledger, queue_id, 10).await;
        ledger.deactivate(queue_id, 10).await.unwrap();

        let (position, active): (i64, bool) = sqlx::query_as(
            "SELECT position, is_active FROM queue_participants WHERE queue_id = ? AND user_id = 10",
        )
        .bind(queue_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(position, 1);
        assert!(!active);
        assert!(ledger.list_active(queue_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_active_insert_is_already_joined() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);
        join(&ledger, queue_id, 10).await;

        // Bypass the find_active check to hit the partial unique index
        let mut tx = ledger.begin().await.unwrap();
        let err = tx.insert(queue_id, 10, 2, 0).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyJoined { user_id: 10, .. }
        ));
    }

    #[tokio::test]
    async fn test_remove_front_and_compact() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);
        for user_id in [10, 11, 12] {
            join(&ledger, queue_id, user_id).await;
        }

        let mut tx = ledger.begin().await.unwrap();
        assert!(tx.lock_queue(queue_id).await.unwrap());
        assert_eq!(tx.remove_front(queue_id).await.unwrap(), Some(10));
        assert_eq!(tx.compact_positions(queue_id).await.unwrap(), 2);
        tx.commit().await.unwrap();

        let active = ledger.list_active(queue_id).await.unwrap();
        let order: Vec<_> = active.iter().map(|p| (p.user_id, p.position)).collect();
        assert_eq!(order, vec![(11, 1), (12, 2)]);
    }

    #[tokio::test]
    async fn test_rolled_back_shift_leaves_positions() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);
        join(&ledger, queue_id, 10).await;
        join(&ledger, queue_id, 11).await;

        {
            let mut tx = ledger.begin().await.unwrap();
            tx.remove_front(queue_id).await.unwrap();
            // dropped before compaction and commit
        }

        assert_eq!(ledger.position_of(queue_id, 10).await.unwrap(), 1);
        assert_eq!(ledger.position_of(queue_id, 11).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_position_of_unknown_user() {
        let (pool, queue_id) = setup_test_db().await;
        let ledger = SqliteParticipantLedger::new(pool);

        let err = ledger.position_of(queue_id, 77).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
