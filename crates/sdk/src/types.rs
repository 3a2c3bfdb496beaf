//! SDK Request/Response Types
//!
//! Mirrors the JSON-RPC types from the api-rpc crate.

use serde::{Deserialize, Serialize};

/// Fields for a new queue; anything left `None` is filled in by the service
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateQueue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<i64>,
}

/// Full replacement of a queue's editable fields
#[derive(Debug, Clone, Serialize)]
pub struct UpdateQueue {
    pub title: Option<String>,
    pub availability_id: Option<i64>,
    pub time_start: i64,
    pub time_end: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Queue {
    pub id: i64,
    pub title: Option<String>,
    pub group_id: Option<i64>,
    pub availability_id: Option<i64>,
    pub time_start: i64,
    pub time_end: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateQueueResponse {
    pub queue_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListQueuesResponse {
    pub queues: Vec<Queue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteQueueResponse {
    pub queue_id: i64,
    pub deleted: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinResponse {
    pub queue_id: i64,
    pub user_id: i64,
    pub participant_id: i64,
    pub position: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeaveResponse {
    pub queue_id: i64,
    pub user_id: i64,
    pub left: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PositionResponse {
    pub queue_id: i64,
    pub user_id: i64,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Participant {
    pub user_id: i64,
    pub position: i64,
    pub joined_at: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParticipantsResponse {
    pub queue_id: i64,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShiftResponse {
    pub queue_id: i64,
    pub served_user_id: Option<i64>,
    pub compacted: u64,
}

/// Request parameters as sent on the wire: token plus method fields
#[derive(Debug, Serialize)]
pub(crate) struct Authed<'a, T: Serialize> {
    pub access_token: &'a str,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueueRef {
    pub queue_id: i64,
}

#[derive(Debug, Serialize)]
pub(crate) struct Membership {
    pub queue_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QueueUpdate {
    pub queue_id: i64,
    #[serde(flatten)]
    pub changes: UpdateQueue,
}

#[derive(Debug, Serialize)]
pub(crate) struct Empty {}
