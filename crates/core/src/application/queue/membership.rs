// Membership Use Cases (join / leave / shift)
//
// Ordering invariant: within a queue, join and shift run inside one
// ledger transaction that starts by locking the queue, so no two joins
// can observe the same `next_position`.

use crate::domain::{ParticipantId, Position, QueueId, ShiftOutcome, UserId};
use crate::error::{AppError, Result};
use crate::port::{ParticipantLedger, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What a successful join hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinReceipt {
    pub participant_id: ParticipantId,
    pub position: Position,
}

fn queue_not_found(queue_id: QueueId) -> AppError {
    AppError::NotFound(format!("Queue {} not found", queue_id))
}

/// Execute join (NotJoined -> Joined)
///
/// Existence check, position computation and insert share one transaction.
pub async fn join(
    ledger: &dyn ParticipantLedger,
    time_provider: &dyn TimeProvider,
    queue_id: QueueId,
    user_id: UserId,
) -> Result<JoinReceipt> {
    let mut tx = ledger.begin().await?;

    if !tx.lock_queue(queue_id).await? {
        tx.rollback().await?;
        return Err(queue_not_found(queue_id));
    }

    if let Some(existing) = tx.find_active(queue_id, user_id).await? {
        debug!(queue_id, user_id, participant_id = existing, "Join rejected: already active");
        tx.rollback().await?;
        return Err(AppError::AlreadyJoined { queue_id, user_id });
    }

    let position = tx.next_position(queue_id).await?;
    let participant_id = tx
        .insert(queue_id, user_id, position, time_provider.now_millis())
        .await?;

    tx.commit().await?;

    Ok(JoinReceipt {
        participant_id,
        position,
    })
}

/// Execute leave (Joined -> NotJoined)
///
/// Remaining positions are left as they are; only `shift` compacts.
pub async fn leave(
    ledger: &dyn ParticipantLedger,
    queue_id: QueueId,
    user_id: UserId,
) -> Result<()> {
    ledger.deactivate(queue_id, user_id).await
}

/// Execute shift: drop the front participant and move everyone up.
///
/// Both steps commit together or not at all. An empty queue is a no-op.
pub async fn shift(ledger: &dyn ParticipantLedger, queue_id: QueueId) -> Result<ShiftOutcome> {
    let mut tx = ledger.begin().await?;

    if !tx.lock_queue(queue_id).await? {
        tx.rollback().await?;
        return Err(queue_not_found(queue_id));
    }

    let served_user_id = tx.remove_front(queue_id).await?;
    let compacted = tx.compact_positions(queue_id).await?;

    tx.commit().await?;

    Ok(ShiftOutcome {
        served_user_id,
        compacted,
    })
}
