//! RPC Method Handlers
//!
//! Resolves the caller from the access token, then hands off to the
//! Queue Service. Admin checks live in the service, not here.

use crate::error::{throttled, to_rpc_error};
use crate::rate_limiter::RateLimiter;
use crate::types::{
    CreateQueueParams, CreateQueueResponse, DeleteQueueResponse, JoinResponse, LeaveResponse,
    ListQueuesParams, ListQueuesResponse, MembershipParams, ParticipantsResponse,
    PositionResponse, QueueRefParams, ShiftResponse, UpdateQueueParams,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use tracing::warn;
use waitlist_core::application::QueueService;
use waitlist_core::domain::{Caller, Queue};
use waitlist_core::port::AccessBoundary;

/// Per-caller limits on join/leave
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_burst: u32,
    pub rate_per_sec: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_burst: 20,
            rate_per_sec: 5,
        }
    }
}

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
    access: Arc<dyn AccessBoundary>,
    rate_limiter: RateLimiter,
}

type RpcResult<T> = Result<T, ErrorObjectOwned>;

impl RpcHandler {
    pub fn new(
        service: Arc<QueueService>,
        access: Arc<dyn AccessBoundary>,
        limits: RateLimitConfig,
    ) -> Self {
        Self {
            service,
            access,
            rate_limiter: RateLimiter::new(limits.max_burst, limits.rate_per_sec),
        }
    }

    fn authenticate(&self, access_token: &str) -> RpcResult<Caller> {
        self.access.resolve(access_token).map_err(to_rpc_error)
    }

    async fn throttle(&self, caller: &Caller) -> RpcResult<()> {
        if !self.rate_limiter.check(caller.user_id).await {
            warn!(user_id = %caller.user_id, "Rate limit exceeded");
            return Err(throttled());
        }
        Ok(())
    }

    /// queue.create.v1
    pub async fn create_queue(&self, params: CreateQueueParams) -> RpcResult<CreateQueueResponse> {
        let caller = self.authenticate(&params.access_token)?;
        let queue_id = self
            .service
            .create_queue(&caller, params.queue)
            .await
            .map_err(to_rpc_error)?;

        Ok(CreateQueueResponse { queue_id })
    }

    /// queue.get.v1
    pub async fn get_queue(&self, params: QueueRefParams) -> RpcResult<Queue> {
        self.authenticate(&params.access_token)?;
        self.service
            .get_queue(params.queue_id)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.list.v1
    pub async fn list_queues(&self, params: ListQueuesParams) -> RpcResult<ListQueuesResponse> {
        self.authenticate(&params.access_token)?;
        let queues = self.service.list_queues().await.map_err(to_rpc_error)?;

        Ok(ListQueuesResponse { queues })
    }

    /// queue.update.v1
    pub async fn update_queue(&self, params: UpdateQueueParams) -> RpcResult<Queue> {
        let caller = self.authenticate(&params.access_token)?;
        self.service
            .update_queue(&caller, params.queue_id, params.changes)
            .await
            .map_err(to_rpc_error)
    }

    /// queue.delete.v1
    pub async fn delete_queue(&self, params: QueueRefParams) -> RpcResult<DeleteQueueResponse> {
        let caller = self.authenticate(&params.access_token)?;
        self.service
            .delete_queue(&caller, params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(DeleteQueueResponse {
            queue_id: params.queue_id,
            deleted: true,
        })
    }

    /// queue.join.v1
    pub async fn join(&self, params: MembershipParams) -> RpcResult<JoinResponse> {
        let caller = self.authenticate(&params.access_token)?;
        let user_id = caller.acting_for(params.user_id).map_err(to_rpc_error)?;
        self.throttle(&caller).await?;

        let receipt = self
            .service
            .join(params.queue_id, user_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(JoinResponse {
            queue_id: params.queue_id,
            user_id,
            participant_id: receipt.participant_id,
            position: receipt.position,
        })
    }

    /// queue.leave.v1
    pub async fn leave(&self, params: MembershipParams) -> RpcResult<LeaveResponse> {
        let caller = self.authenticate(&params.access_token)?;
        let user_id = caller.acting_for(params.user_id).map_err(to_rpc_error)?;
        self.throttle(&caller).await?;

        self.service
            .leave(params.queue_id, user_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(LeaveResponse {
            queue_id: params.queue_id,
            user_id,
            left: true,
        })
    }

    /// queue.participants.v1
    pub async fn participants(&self, params: QueueRefParams) -> RpcResult<ParticipantsResponse> {
        self.authenticate(&params.access_token)?;
        let participants = self
            .service
            .participants(params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ParticipantsResponse {
            queue_id: params.queue_id,
            participants: participants.into_iter().map(Into::into).collect(),
        })
    }

    /// queue.position.v1
    pub async fn position(&self, params: MembershipParams) -> RpcResult<PositionResponse> {
        let caller = self.authenticate(&params.access_token)?;
        let user_id = caller.acting_for(params.user_id).map_err(to_rpc_error)?;

        let position = self
            .service
            .position(params.queue_id, user_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(PositionResponse {
            queue_id: params.queue_id,
            user_id,
            position,
        })
    }

    /// queue.shift.v1
    pub async fn shift(&self, params: QueueRefParams) -> RpcResult<ShiftResponse> {
        let caller = self.authenticate(&params.access_token)?;
        let outcome = self
            .service
            .shift_queue(&caller, params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ShiftResponse {
            queue_id: params.queue_id,
            served_user_id: outcome.served_user_id,
            compacted: outcome.compacted,
        })
    }
}
