// Queue Catalog Use Cases (create / update)

use crate::domain::queue::normalize_title;
use crate::domain::{AvailabilityId, GroupId, NewQueue, Queue, QueueId, TimeWindow};
use crate::error::Result;
use crate::port::{QueueRepository, TimeProvider};
use serde::{Deserialize, Serialize};

/// Create request; every field is optional
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub group_id: Option<GroupId>,
    #[serde(default)]
    pub availability_id: Option<AvailabilityId>,
    #[serde(default)]
    pub time_start: Option<i64>,
    #[serde(default)]
    pub time_end: Option<i64>,
    /// Window length when `time_end` is not given
    #[serde(default)]
    pub duration_hours: Option<i64>,
}

/// Full replacement of the mutable queue fields
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQueueRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub availability_id: Option<AvailabilityId>,
    pub time_start: i64,
    pub time_end: i64,
}

/// Execute create use case
///
/// # Arguments
///
/// * `queues` - Queue store
/// * `time_provider` - Clock for the default window (injected for determinism)
/// * `default_duration_hours` - Window length when the caller gives neither end nor duration
/// * `req` - Create request
pub async fn create(
    queues: &dyn QueueRepository,
    time_provider: &dyn TimeProvider,
    default_duration_hours: i64,
    req: CreateQueueRequest,
) -> Result<QueueId> {
    let window = TimeWindow::resolve(
        req.time_start,
        req.time_end,
        req.duration_hours,
        time_provider.now_millis(),
        default_duration_hours,
    )?;

    let queue = NewQueue::new(req.title, window)?
        .with_group(req.group_id)
        .with_availability(req.availability_id);

    queues.create(&queue).await
}

/// Execute update use case, returning the stored queue
pub async fn update(
    queues: &dyn QueueRepository,
    id: QueueId,
    req: UpdateQueueRequest,
) -> Result<Queue> {
    let window = TimeWindow::new(req.time_start, req.time_end)?;
    let title = normalize_title(req.title)?;

    let mut queue = queues.get_by_id(id).await?;
    queue.title = title;
    queue.availability_id = req.availability_id;
    queue.time_start = window.start();
    queue.time_end = window.end();

    queues.update(&queue).await?;
    Ok(queue)
}
