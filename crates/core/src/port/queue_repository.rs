// Queue Store Port (Interface)

use crate::domain::{NewQueue, Queue, QueueId};
use crate::error::Result;
use async_trait::async_trait;

/// Repository interface for Queue persistence
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Insert a new queue, returning its id
    async fn create(&self, queue: &NewQueue) -> Result<QueueId>;

    /// Find queue by ID (`NotFound` if missing)
    async fn get_by_id(&self, id: QueueId) -> Result<Queue>;

    /// All queues, most recent `time_start` first
    async fn list_all(&self) -> Result<Vec<Queue>>;

    /// Replace title, availability and time window (`NotFound` if missing)
    async fn update(&self, queue: &Queue) -> Result<()>;

    /// Delete queue; participant rows go with it (`NotFound` if missing)
    async fn delete(&self, id: QueueId) -> Result<()>;
}
