//! Waitlist Client Implementation

use crate::error::{Result, SdkError};
use crate::types::{
    Authed, CreateQueue, CreateQueueResponse, DeleteQueueResponse, Empty, JoinResponse,
    LeaveResponse, ListQueuesResponse, Membership, ParticipantsResponse, PositionResponse, Queue,
    QueueRef, QueueUpdate, ShiftResponse, UpdateQueue,
};
use jsonrpsee::core::client::ClientT;
use jsonrpsee::core::params::ObjectParams;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Waitlist Client
///
/// Every call is made as the holder of `access_token`.
///
/// # Example
///
/// ```no_run
/// use waitlist_sdk::WaitlistClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = WaitlistClient::connect("http://127.0.0.1:9630", "<token>").await?;
/// let joined = client.join(1, None).await?;
/// println!("position {}", joined.position);
/// # Ok(())
/// # }
/// ```
pub struct WaitlistClient {
    client: HttpClient,
    access_token: String,
}

impl WaitlistClient {
    /// Connect to the Waitlist daemon
    ///
    /// # Arguments
    ///
    /// * `url` - RPC endpoint URL (e.g., `http://127.0.0.1:9630`)
    /// * `access_token` - Bearer token identifying the caller
    pub async fn connect(url: impl AsRef<str>, access_token: impl Into<String>) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(Duration::from_secs(30))
            .build(url)
            .map_err(|e| SdkError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            access_token: access_token.into(),
        })
    }

    async fn call<T, R>(&self, method: &str, body: T) -> Result<R>
    where
        T: Serialize,
        R: DeserializeOwned,
    {
        let params = to_params(&Authed {
            access_token: &self.access_token,
            body,
        })?;
        Ok(self.client.request(method, params).await?)
    }

    /// All queues, most recent first
    pub async fn list_queues(&self) -> Result<Vec<Queue>> {
        let response: ListQueuesResponse = self.call("queue.list.v1", Empty {}).await?;
        Ok(response.queues)
    }

    pub async fn get_queue(&self, queue_id: i64) -> Result<Queue> {
        self.call("queue.get.v1", QueueRef { queue_id }).await
    }

    /// Create a queue (admin token required)
    pub async fn create_queue(&self, queue: CreateQueue) -> Result<i64> {
        let response: CreateQueueResponse = self.call("queue.create.v1", queue).await?;
        Ok(response.queue_id)
    }

    /// Replace title, availability and window (admin token required)
    pub async fn update_queue(&self, queue_id: i64, changes: UpdateQueue) -> Result<Queue> {
        self.call("queue.update.v1", QueueUpdate { queue_id, changes })
            .await
    }

    /// Delete a queue and its participants (admin token required)
    pub async fn delete_queue(&self, queue_id: i64) -> Result<DeleteQueueResponse> {
        self.call("queue.delete.v1", QueueRef { queue_id }).await
    }

    /// Join a queue; `user_id` other than the caller needs an admin token
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use waitlist_sdk::WaitlistClient;
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// # let client = WaitlistClient::connect("http://127.0.0.1:9630", "<token>").await?;
    /// match client.join(3, None).await {
    ///     Ok(joined) => println!("You are number {}", joined.position),
    ///     Err(e) if e.is_already_joined() => println!("Already waiting"),
    ///     Err(e) => return Err(e.into()),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn join(&self, queue_id: i64, user_id: Option<i64>) -> Result<JoinResponse> {
        self.call("queue.join.v1", Membership { queue_id, user_id })
            .await
    }

    pub async fn leave(&self, queue_id: i64, user_id: Option<i64>) -> Result<LeaveResponse> {
        self.call("queue.leave.v1", Membership { queue_id, user_id })
            .await
    }

    /// Active participants ordered by position
    pub async fn participants(&self, queue_id: i64) -> Result<ParticipantsResponse> {
        self.call("queue.participants.v1", QueueRef { queue_id })
            .await
    }

    pub async fn position(&self, queue_id: i64, user_id: Option<i64>) -> Result<PositionResponse> {
        self.call("queue.position.v1", Membership { queue_id, user_id })
            .await
    }

    /// Serve the front of the queue (admin token required)
    pub async fn shift(&self, queue_id: i64) -> Result<ShiftResponse> {
        self.call("queue.shift.v1", QueueRef { queue_id }).await
    }
}

/// Named params: the server expects a single JSON object
fn to_params<T: Serialize>(value: &T) -> Result<ObjectParams> {
    let mut params = ObjectParams::new();
    match serde_json::to_value(value)? {
        serde_json::Value::Object(map) => {
            for (key, value) in map {
                params.insert(&key, value)?;
            }
            Ok(params)
        }
        other => Err(SdkError::Other(format!(
            "Request must serialize to an object, got {}",
            other
        ))),
    }
}
