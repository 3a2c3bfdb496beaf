// Queue Participant Domain Model

use crate::domain::QueueId;
use serde::{Deserialize, Serialize};

/// Participant row identifier
pub type ParticipantId = i64;

/// User identifier (identity lives outside this service)
pub type UserId = i64;

/// 1-based rank among active participants; lower is served earlier
pub type Position = i64;

/// Membership of a user in a queue.
///
/// `is_active = false` is a soft delete: the row is kept and its last
/// position is history only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueParticipant {
    pub id: ParticipantId,
    pub queue_id: QueueId,
    pub user_id: UserId,
    pub position: Position,
    pub joined_at: i64, // epoch ms
    pub is_active: bool,
}

/// Result of an admin shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftOutcome {
    /// User removed from the front, `None` if position 1 was vacant
    pub served_user_id: Option<UserId>,
    /// Active rows moved one place forward
    pub compacted: u64,
}

/// True when the active positions are exactly `1..=N`.
///
/// Input must be ordered by position (as `list_active` returns it).
pub fn positions_are_contiguous(participants: &[QueueParticipant]) -> bool {
    participants
        .iter()
        .enumerate()
        .all(|(i, p)| p.is_active && p.position == i as Position + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(user_id: UserId, position: Position) -> QueueParticipant {
        QueueParticipant {
            id: user_id,
            queue_id: 1,
            user_id,
            position,
            joined_at: 0,
            is_active: true,
        }
    }

    #[test]
    fn test_contiguous_positions() {
        assert!(positions_are_contiguous(&[]));
        assert!(positions_are_contiguous(&[
            participant(10, 1),
            participant(11, 2),
            participant(12, 3)
        ]));
    }

    #[test]
    fn test_gap_is_not_contiguous() {
        assert!(!positions_are_contiguous(&[
            participant(11, 2),
            participant(12, 3)
        ]));
        assert!(!positions_are_contiguous(&[
            participant(10, 1),
            participant(12, 3)
        ]));
    }
}
