//! RPC Request/Response Types
//!
//! Every request carries the caller's `access_token`; the handler resolves
//! it before doing anything else.

use serde::{Deserialize, Serialize};
use waitlist_core::application::{CreateQueueRequest, UpdateQueueRequest};
use waitlist_core::domain::{
    ParticipantId, Position, Queue, QueueId, QueueParticipant, UserId,
};

/// queue.create.v1 - Create a queue (admin)
#[derive(Debug, Deserialize)]
pub struct CreateQueueParams {
    pub access_token: String,
    #[serde(flatten)]
    pub queue: CreateQueueRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateQueueResponse {
    pub queue_id: QueueId,
}

/// queue.get.v1 / queue.participants.v1 / queue.shift.v1 / queue.delete.v1
#[derive(Debug, Deserialize)]
pub struct QueueRefParams {
    pub access_token: String,
    pub queue_id: QueueId,
}

/// queue.list.v1
#[derive(Debug, Deserialize)]
pub struct ListQueuesParams {
    pub access_token: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<Queue>,
}

/// queue.update.v1 - Replace title, availability and window (admin)
#[derive(Debug, Deserialize)]
pub struct UpdateQueueParams {
    pub access_token: String,
    pub queue_id: QueueId,
    #[serde(flatten)]
    pub changes: UpdateQueueRequest,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteQueueResponse {
    pub queue_id: QueueId,
    pub deleted: bool,
}

/// queue.join.v1 / queue.leave.v1 / queue.position.v1
///
/// `user_id` defaults to the caller; naming someone else requires admin.
#[derive(Debug, Deserialize)]
pub struct MembershipParams {
    pub access_token: String,
    pub queue_id: QueueId,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

#[derive(Debug, Clone, Serialize)]
pub struct JoinResponse {
    pub queue_id: QueueId,
    pub user_id: UserId,
    pub participant_id: ParticipantId,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaveResponse {
    pub queue_id: QueueId,
    pub user_id: UserId,
    pub left: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionResponse {
    pub queue_id: QueueId,
    pub user_id: UserId,
    pub position: Position,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParticipantsResponse {
    pub queue_id: QueueId,
    pub participants: Vec<ParticipantView>,
}

/// Public view of an active participant
#[derive(Debug, Clone, Serialize)]
pub struct ParticipantView {
    pub user_id: UserId,
    pub position: Position,
    pub joined_at: i64,
}

impl From<QueueParticipant> for ParticipantView {
    fn from(p: QueueParticipant) -> Self {
        Self {
            user_id: p.user_id,
            position: p.position,
            joined_at: p.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ShiftResponse {
    pub queue_id: QueueId,
    pub served_user_id: Option<UserId>,
    pub compacted: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_params_flatten_queue_fields() {
        let params: CreateQueueParams = serde_json::from_value(json!({
            "access_token": "t",
            "title": "Office hours",
            "duration_hours": 2
        }))
        .unwrap();

        assert_eq!(params.queue.title.as_deref(), Some("Office hours"));
        assert_eq!(params.queue.duration_hours, Some(2));
        assert_eq!(params.queue.time_start, None);
    }

    #[test]
    fn test_membership_user_defaults_to_caller() {
        let params: MembershipParams =
            serde_json::from_value(json!({ "access_token": "t", "queue_id": 3 })).unwrap();
        assert_eq!(params.user_id, None);
    }

    #[test]
    fn test_update_requires_window() {
        let result: Result<UpdateQueueParams, _> = serde_json::from_value(json!({
            "access_token": "t",
            "queue_id": 3,
            "title": "no window"
        }));
        assert!(result.is_err());
    }
}
