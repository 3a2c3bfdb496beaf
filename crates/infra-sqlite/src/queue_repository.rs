// SQLite QueueRepository Implementation

use crate::error::map_sqlx_error;
use async_trait::async_trait;
use sqlx::SqlitePool;
use waitlist_core::domain::{NewQueue, Queue, QueueId};
use waitlist_core::error::{AppError, Result};
use waitlist_core::port::QueueRepository;

pub struct SqliteQueueRepository {
    pool: SqlitePool,
}

impl SqliteQueueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn queue_not_found(id: QueueId) -> AppError {
    AppError::NotFound(format!("Queue {} not found", id))
}

#[async_trait]
impl QueueRepository for SqliteQueueRepository {
    async fn create(&self, queue: &NewQueue) -> Result<QueueId> {
        sqlx::query_scalar(
            r#"
            INSERT INTO queues (title, group_id, availability_id, time_start, time_end)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&queue.title)
        .bind(queue.group_id)
        .bind(queue.availability_id)
        .bind(queue.window.start())
        .bind(queue.window.end())
        .fetch_one(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    async fn get_by_id(&self, id: QueueId) -> Result<Queue> {
        let row: Option<QueueRow> = sqlx::query_as(
            r#"
            SELECT id, title, group_id, availability_id, time_start, time_end
            FROM queues WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        row.map(QueueRow::into_queue)
            .ok_or_else(|| queue_not_found(id))
    }

    async fn list_all(&self) -> Result<Vec<Queue>> {
        let rows: Vec<QueueRow> = sqlx::query_as(
            r#"
            SELECT id, title, group_id, availability_id, time_start, time_end
            FROM queues
            ORDER BY time_start DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(QueueRow::into_queue).collect())
    }

    async fn update(&self, queue: &Queue) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE queues
            SET title = ?, availability_id = ?, time_start = ?, time_end = ?
            WHERE id = ?
            "#,
        )
        .bind(&queue.title)
        .bind(queue.availability_id)
        .bind(queue.time_start)
        .bind(queue.time_end)
        .bind(queue.id)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(queue_not_found(queue.id));
        }
        Ok(())
    }

    async fn delete(&self, id: QueueId) -> Result<()> {
        // queue_participants rows go via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM queues WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(queue_not_found(id));
        }
        Ok(())
    }
}

/// SQLite row representation
#[derive(Debug, sqlx::FromRow)]
struct QueueRow {
    id: i64,
    title: Option<String>,
    group_id: Option<i64>,
    availability_id: Option<i64>,
    time_start: i64,
    time_end: i64,
}

impl QueueRow {
    fn into_queue(self) -> Queue {
        Queue {
            id: self.id,
            title: self.title,
            group_id: self.group_id,
            availability_id: self.availability_id,
            time_start: self.time_start,
            time_end: self.time_end,
        }
    }
}
