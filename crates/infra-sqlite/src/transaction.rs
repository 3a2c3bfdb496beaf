// SQLite Ledger Transaction Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction as SqlxTransaction};
use waitlist_core::domain::{ParticipantId, Position, QueueId, UserId};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::{LedgerTransaction, Transaction};

/// Participant ledger transaction.
///
/// Dropped without commit, sqlx rolls it back.
pub struct SqliteLedgerTransaction<'a> {
    tx: SqlxTransaction<'a, Sqlite>,
}

impl<'a> SqliteLedgerTransaction<'a> {
    pub fn new(tx: SqlxTransaction<'a, Sqlite>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl Transaction for SqliteLedgerTransaction<'_> {
    async fn commit(mut self: Box<Self>) -> Result<()> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn rollback(mut self: Box<Self>) -> Result<()> {
        self.tx.rollback().await.map_err(map_sqlx_error)?;
        Ok(())
    }
}

#[async_trait]
impl LedgerTransaction for SqliteLedgerTransaction<'_> {
    async fn lock_queue(&mut self, queue_id: QueueId) -> Result<bool> {
        // A write as the first statement makes SQLite take the write lock
        // before this transaction reads anything (waits up to busy_timeout).
        let result = sqlx::query("UPDATE queues SET title = title WHERE id = ?")
            .bind(queue_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_active(
        &mut self,
        queue_id: QueueId,
        user_id: UserId,
    ) -> Result<Option<ParticipantId>> {
        sqlx::query_scalar(
            r#"
            SELECT id FROM queue_participants
            WHERE queue_id = ? AND user_id = ? AND is_active = 1
            "#,
        )
        .bind(queue_id)
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn next_position(&mut self, queue_id: QueueId) -> Result<Position> {
        sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(position), 0) + 1 FROM queue_participants
            WHERE queue_id = ? AND is_active = 1
            "#,
        )
        .bind(queue_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn insert(
        &mut self,
        queue_id: QueueId,
        user_id: UserId,
        position: Position,
        joined_at: i64,
    ) -> Result<ParticipantId> {
        sqlx::query_scalar(
            r#"
            INSERT INTO queue_participants (queue_id, user_id, position, joined_at, is_active)
            VALUES (?, ?, ?, ?, 1)
            RETURNING id
            "#,
        )
        .bind(queue_id)
        .bind(user_id)
        .bind(position)
        .bind(joined_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| match &e {
            // The partial unique index caught a second active membership
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AppError::AlreadyJoined { queue_id, user_id }
            }
            _ => map_sqlx_error(e),
        })
    }

    async fn remove_front(&mut self, queue_id: QueueId) -> Result<Option<UserId>> {
        sqlx::query_scalar(
            r#"
            DELETE FROM queue_participants
            WHERE queue_id = ? AND position = 1 AND is_active = 1
            RETURNING user_id
            "#,
        )
        .bind(queue_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn compact_positions(&mut self, queue_id: QueueId) -> Result<u64> {
        // Position 1 is gone at this point, so this is every active row
        let result = sqlx::query(
            r#"
            UPDATE queue_participants
            SET position = position - 1
            WHERE queue_id = ? AND is_active = 1 AND position > 1
            "#,
        )
        .bind(queue_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected())
    }
}
