// Queue Service - Queue lifecycle and membership orchestration

pub mod catalog;
pub mod membership;

pub use catalog::{CreateQueueRequest, UpdateQueueRequest};
pub use membership::JoinReceipt;

use crate::domain::{Caller, Position, Queue, QueueId, QueueParticipant, ShiftOutcome, UserId};
use crate::error::{AppError, Result};
use crate::port::{ParticipantLedger, QueueRepository, TimeProvider};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Queue policy knobs
#[derive(Debug, Clone)]
pub struct QueuePolicy {
    /// Window length for queues created without an end time
    pub default_duration_hours: i64,

    /// Deadline for a single operation; expiry rolls the transaction back
    pub operation_timeout: Duration,
}

impl Default for QueuePolicy {
    fn default() -> Self {
        Self {
            default_duration_hours: 5,
            operation_timeout: Duration::from_secs(5),
        }
    }
}

/// Queue Service
///
/// Sole owner of participant `position` and `is_active` transitions.
pub struct QueueService {
    queues: Arc<dyn QueueRepository>,
    ledger: Arc<dyn ParticipantLedger>,
    time_provider: Arc<dyn TimeProvider>,
    policy: QueuePolicy,
}

impl QueueService {
    pub fn new(
        queues: Arc<dyn QueueRepository>,
        ledger: Arc<dyn ParticipantLedger>,
        time_provider: Arc<dyn TimeProvider>,
        policy: QueuePolicy,
    ) -> Self {
        Self {
            queues,
            ledger,
            time_provider,
            policy,
        }
    }

    /// Create a queue (admin only)
    pub async fn create_queue(&self, caller: &Caller, req: CreateQueueRequest) -> Result<QueueId> {
        caller.require_admin("create queue")?;

        let id = self
            .bounded(
                "create queue",
                catalog::create(
                    self.queues.as_ref(),
                    self.time_provider.as_ref(),
                    self.policy.default_duration_hours,
                    req,
                ),
            )
            .await?;

        info!(queue_id = id, admin_id = caller.user_id, "Queue created");
        Ok(id)
    }

    pub async fn get_queue(&self, id: QueueId) -> Result<Queue> {
        self.bounded(format!("get queue={}", id), self.queues.get_by_id(id))
            .await
    }

    pub async fn list_queues(&self) -> Result<Vec<Queue>> {
        self.bounded("list queues", self.queues.list_all()).await
    }

    /// Replace title, availability and window (admin only)
    pub async fn update_queue(
        &self,
        caller: &Caller,
        id: QueueId,
        req: UpdateQueueRequest,
    ) -> Result<Queue> {
        caller.require_admin("update queue")?;

        let queue = self
            .bounded(
                format!("update queue={}", id),
                catalog::update(self.queues.as_ref(), id, req),
            )
            .await?;

        info!(queue_id = id, admin_id = caller.user_id, "Queue updated");
        Ok(queue)
    }

    /// Delete a queue and its participant rows (admin only)
    pub async fn delete_queue(&self, caller: &Caller, id: QueueId) -> Result<()> {
        caller.require_admin("delete queue")?;

        self.bounded(format!("delete queue={}", id), self.queues.delete(id))
            .await?;

        info!(queue_id = id, admin_id = caller.user_id, "Queue deleted");
        Ok(())
    }

    /// Append a user to the back of a queue
    pub async fn join(&self, queue_id: QueueId, user_id: UserId) -> Result<JoinReceipt> {
        let op = format!("join queue={} user={}", queue_id, user_id);
        let receipt = self
            .retry_once(&op, || {
                membership::join(
                    self.ledger.as_ref(),
                    self.time_provider.as_ref(),
                    queue_id,
                    user_id,
                )
            })
            .await?;

        info!(
            queue_id,
            user_id,
            participant_id = receipt.participant_id,
            position = receipt.position,
            "User joined queue"
        );
        Ok(receipt)
    }

    /// Leave a queue; other participants keep their positions
    pub async fn leave(&self, queue_id: QueueId, user_id: UserId) -> Result<()> {
        self.bounded(
            format!("leave queue={} user={}", queue_id, user_id),
            membership::leave(self.ledger.as_ref(), queue_id, user_id),
        )
        .await?;

        info!(queue_id, user_id, "User left queue");
        Ok(())
    }

    /// Serve the front of the queue (admin only)
    pub async fn shift_queue(&self, caller: &Caller, queue_id: QueueId) -> Result<ShiftOutcome> {
        caller.require_admin("shift queue")?;

        let op = format!("shift queue={}", queue_id);
        let outcome = self
            .retry_once(&op, || membership::shift(self.ledger.as_ref(), queue_id))
            .await?;

        info!(
            queue_id,
            admin_id = caller.user_id,
            served_user_id = ?outcome.served_user_id,
            compacted = outcome.compacted,
            "Queue shifted"
        );
        Ok(outcome)
    }

    /// Authoritative queue view: active participants by position
    pub async fn participants(&self, queue_id: QueueId) -> Result<Vec<QueueParticipant>> {
        self.bounded(
            format!("participants queue={}", queue_id),
            self.ledger.list_active(queue_id),
        )
        .await
    }

    pub async fn position(&self, queue_id: QueueId, user_id: UserId) -> Result<Position> {
        self.bounded(
            format!("position queue={} user={}", queue_id, user_id),
            self.ledger.position_of(queue_id, user_id),
        )
        .await
    }

    /// Run `fut` under the operation deadline, tagging failures with `op`
    async fn bounded<T, F>(&self, op: impl std::fmt::Display, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        self.until(&op.to_string(), self.deadline(), fut).await
    }

    /// Like `bounded`, but a write conflict gets one more attempt.
    /// Both attempts share a single deadline.
    async fn retry_once<T, F, Fut>(&self, op: &str, mut attempt: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let deadline = self.deadline();
        match self.until(op, deadline, attempt()).await {
            Err(e) if e.is_retryable() => {
                warn!(operation = op, error = %e, "Write conflict, retrying once");
                self.until(op, deadline, attempt()).await
            }
            other => other,
        }
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.policy.operation_timeout
    }

    async fn until<T, F>(&self, op: &str, deadline: Instant, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout_at(deadline, fut).await {
            Ok(result) => result.map_err(|e| e.with_context(op)),
            Err(_) => Err(AppError::Timeout(format!(
                "{}: exceeded {} ms",
                op,
                self.policy.operation_timeout.as_millis()
            ))),
        }
    }
}
