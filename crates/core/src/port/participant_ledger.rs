// Participant Ledger Port (Interface)

use crate::domain::{ParticipantId, Position, QueueId, QueueParticipant, UserId};
use crate::error::Result;
use crate::port::Transaction;
use async_trait::async_trait;

/// Low-level access to participant rows.
///
/// Each call is atomic on its own; cross-call invariants are the
/// Queue Service's job.
#[async_trait]
pub trait ParticipantLedger: Send + Sync {
    /// Begin a new transaction
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>>;

    /// Flip the active row to inactive.
    ///
    /// `NotFound` when no active row matched (decided by affected rows).
    async fn deactivate(&self, queue_id: QueueId, user_id: UserId) -> Result<()>;

    /// Active rows, ascending by position
    async fn list_active(&self, queue_id: QueueId) -> Result<Vec<QueueParticipant>>;

    /// Active position of a user (`NotFound` if not in queue)
    async fn position_of(&self, queue_id: QueueId, user_id: UserId) -> Result<Position>;
}

/// Participant ledger operations within a transaction
#[async_trait]
pub trait LedgerTransaction: Transaction {
    /// Take the write lock for this queue before reading anything.
    ///
    /// Returns false if the queue does not exist.
    async fn lock_queue(&mut self, queue_id: QueueId) -> Result<bool>;

    /// Active participant row for (queue, user), if any
    async fn find_active(
        &mut self,
        queue_id: QueueId,
        user_id: UserId,
    ) -> Result<Option<ParticipantId>>;

    /// `max(active position) + 1`, or 1 for an empty queue
    async fn next_position(&mut self, queue_id: QueueId) -> Result<Position>;

    /// Insert a new active row
    async fn insert(
        &mut self,
        queue_id: QueueId,
        user_id: UserId,
        position: Position,
        joined_at: i64,
    ) -> Result<ParticipantId>;

    /// Hard-delete the active row at position 1, returning its user
    async fn remove_front(&mut self, queue_id: QueueId) -> Result<Option<UserId>>;

    /// Move every remaining active row one place forward
    async fn compact_positions(&mut self, queue_id: QueueId) -> Result<u64>;
}
