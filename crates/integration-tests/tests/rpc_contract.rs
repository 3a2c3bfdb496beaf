//! End-to-end: SDK client against a live JSON-RPC server

mod common;

use common::Fixture;
use waitlist_api_rpc::{
    JwtAccessBoundary, RateLimitConfig, RpcServer, RpcServerConfig, ServerHandle,
};
use waitlist_core::domain::Caller;
use waitlist_sdk::{code, CreateQueue, Participant, UpdateQueue, WaitlistClient};

const SECRET: &str = "contract-secret";

struct Harness {
    url: String,
    issuer: JwtAccessBoundary,
    handle: ServerHandle,
    _fx: Fixture,
}

impl Harness {
    async fn start(rate_limit: RateLimitConfig) -> Self {
        let fx = Fixture::in_memory().await;
        let config = RpcServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            rate_limit,
        };
        let (handle, addr) = RpcServer::new(
            config,
            fx.service.clone(),
            std::sync::Arc::new(JwtAccessBoundary::new(SECRET)),
        )
        .start()
        .await
        .unwrap();

        Self {
            url: format!("http://{}", addr),
            issuer: JwtAccessBoundary::new(SECRET),
            handle,
            _fx: fx,
        }
    }

    async fn client(&self, caller: Caller) -> WaitlistClient {
        let token = self
            .issuer
            .issue(caller, chrono::Duration::minutes(5))
            .unwrap();
        WaitlistClient::connect(&self.url, token).await.unwrap()
    }

    async fn stop(self) {
        self.handle.stop().unwrap();
        self.handle.stopped().await;
    }
}

fn order(participants: &[Participant]) -> Vec<(i64, i64)> {
    participants
        .iter()
        .map(|p| (p.user_id, p.position))
        .collect()
}

#[tokio::test]
async fn test_queue_scenario_over_rpc() {
    let h = Harness::start(RateLimitConfig::default()).await;
    let admin = h.client(Caller::admin(1)).await;
    let alice = h.client(Caller::user(10)).await;
    let bob = h.client(Caller::user(11)).await;
    let carol = h.client(Caller::user(12)).await;

    let q = admin
        .create_queue(CreateQueue {
            title: Some("Consultations".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(alice.join(q, None).await.unwrap().position, 1);
    assert_eq!(bob.join(q, None).await.unwrap().position, 2);
    assert!(alice.leave(q, None).await.unwrap().left);
    assert_eq!(carol.join(q, None).await.unwrap().position, 3);
    assert_eq!(carol.position(q, None).await.unwrap().position, 3);

    let shifted = admin.shift(q).await.unwrap();
    assert_eq!(shifted.served_user_id, None);
    assert_eq!(shifted.compacted, 2);

    let view = bob.participants(q).await.unwrap();
    assert_eq!(order(&view.participants), vec![(11, 1), (12, 2)]);

    h.stop().await;
}

#[tokio::test]
async fn test_error_codes_over_rpc() {
    let h = Harness::start(RateLimitConfig::default()).await;
    let admin = h.client(Caller::admin(1)).await;
    let user = h.client(Caller::user(10)).await;

    let q = admin.create_queue(CreateQueue::default()).await.unwrap();
    user.join(q, None).await.unwrap();

    let err = user.join(q, None).await.unwrap_err();
    assert!(err.is_already_joined());

    let err = user.shift(q).await.unwrap_err();
    assert_eq!(err.code(), Some(code::FORBIDDEN));

    let err = user.join(q, Some(11)).await.unwrap_err();
    assert_eq!(err.code(), Some(code::FORBIDDEN));

    let err = user.join(q + 100, None).await.unwrap_err();
    assert!(err.is_not_found());

    let err = user.position(q + 100, None).await.unwrap_err();
    assert!(err.is_not_found());

    let stranger = WaitlistClient::connect(&h.url, "not-a-token").await.unwrap();
    let err = stranger.list_queues().await.unwrap_err();
    assert_eq!(err.code(), Some(code::UNAUTHORIZED));

    h.stop().await;
}

#[tokio::test]
async fn test_queue_crud_over_rpc() {
    let h = Harness::start(RateLimitConfig::default()).await;
    let admin = h.client(Caller::admin(1)).await;

    let q = admin
        .create_queue(CreateQueue {
            time_start: Some(1_000),
            time_end: Some(2_000),
            ..Default::default()
        })
        .await
        .unwrap();

    let updated = admin
        .update_queue(
            q,
            UpdateQueue {
                title: Some("Renamed".to_string()),
                availability_id: Some(4),
                time_start: 1_500,
                time_end: 3_000,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title.as_deref(), Some("Renamed"));
    assert_eq!(admin.get_queue(q).await.unwrap(), updated);
    assert_eq!(admin.list_queues().await.unwrap(), vec![updated]);

    let err = admin
        .update_queue(
            q,
            UpdateQueue {
                title: None,
                availability_id: None,
                time_start: 5,
                time_end: 5,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), Some(4000));

    assert!(admin.delete_queue(q).await.unwrap().deleted);
    assert!(admin.get_queue(q).await.unwrap_err().is_not_found());

    h.stop().await;
}

#[tokio::test]
async fn test_join_is_throttled_per_caller() {
    let h = Harness::start(RateLimitConfig {
        max_burst: 3,
        rate_per_sec: 1,
    })
    .await;
    let admin = h.client(Caller::admin(1)).await;
    let user = h.client(Caller::user(10)).await;
    let q = admin.create_queue(CreateQueue::default()).await.unwrap();

    user.join(q, None).await.unwrap();
    user.leave(q, None).await.unwrap();
    user.join(q, None).await.unwrap();

    let err = user.leave(q, None).await.unwrap_err();
    assert_eq!(err.code(), Some(code::THROTTLED));

    // Still in the queue: the throttled leave never ran
    assert_eq!(user.position(q, None).await.unwrap().position, 1);

    h.stop().await;
}
