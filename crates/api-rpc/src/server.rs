//! JSON-RPC Server
//!
//! Serves the queue API over HTTP (jsonrpsee). Binds to localhost unless
//! configured otherwise.

use crate::error::ServerError;
use crate::handler::{RateLimitConfig, RpcHandler};
use crate::types::{
    CreateQueueParams, ListQueuesParams, MembershipParams, QueueRefParams, UpdateQueueParams,
};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use waitlist_core::application::QueueService;
use waitlist_core::port::AccessBoundary;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

/// Register one method: parse params, delegate to the handler
macro_rules! register {
    ($module:expr, $handler:expr, $name:literal, $params:ty, $method:ident) => {{
        let handler = $handler.clone();
        $module.register_async_method($name, move |params, _, _| {
            let handler = handler.clone();
            async move {
                let req: $params = params.parse()?;
                handler.$method(req).await
            }
        })?;
    }};
}

impl RpcServer {
    pub fn new(
        config: RpcServerConfig,
        service: Arc<QueueService>,
        access: Arc<dyn AccessBoundary>,
    ) -> Self {
        let handler = Arc::new(RpcHandler::new(service, access, config.rate_limit));
        Self { config, handler }
    }

    /// All queue methods, ready to mount on a server
    pub fn module(&self) -> Result<RpcModule<()>, ServerError> {
        let mut module = RpcModule::new(());
        let handler = &self.handler;

        register!(module, handler, "queue.create.v1", CreateQueueParams, create_queue);
        register!(module, handler, "queue.get.v1", QueueRefParams, get_queue);
        register!(module, handler, "queue.list.v1", ListQueuesParams, list_queues);
        register!(module, handler, "queue.update.v1", UpdateQueueParams, update_queue);
        register!(module, handler, "queue.delete.v1", QueueRefParams, delete_queue);
        register!(module, handler, "queue.join.v1", MembershipParams, join);
        register!(module, handler, "queue.leave.v1", MembershipParams, leave);
        register!(module, handler, "queue.participants.v1", QueueRefParams, participants);
        register!(module, handler, "queue.position.v1", MembershipParams, position);
        register!(module, handler, "queue.shift.v1", QueueRefParams, shift);

        Ok(module)
    }

    /// Start the JSON-RPC server, returning its handle and bound address
    pub async fn start(self) -> Result<(ServerHandle, SocketAddr), ServerError> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        info!(
            host = %self.config.host,
            port = %self.config.port,
            "Starting JSON-RPC server"
        );

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        let local_addr = server
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let module = self.module()?;
        let handle = server.start(module);

        info!(addr = %local_addr, "JSON-RPC server started successfully");
        Ok((handle, local_addr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtAccessBoundary;
    use waitlist_core::application::QueuePolicy;
    use waitlist_core::port::SystemTimeProvider;
    use waitlist_infra_sqlite::{
        create_pool, run_migrations, SqliteParticipantLedger, SqliteQueueRepository,
    };

    #[tokio::test]
    async fn test_module_registers_every_method() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let service = Arc::new(QueueService::new(
            Arc::new(SqliteQueueRepository::new(pool.clone())),
            Arc::new(SqliteParticipantLedger::new(pool)),
            Arc::new(SystemTimeProvider),
            QueuePolicy::default(),
        ));
        let server = RpcServer::new(
            RpcServerConfig::default(),
            service,
            Arc::new(JwtAccessBoundary::new("s")),
        );

        let module = server.module().unwrap();
        let mut names: Vec<_> = module.method_names().collect();
        names.sort_unstable();
        assert_eq!(
            names,
            vec![
                "queue.create.v1",
                "queue.delete.v1",
                "queue.get.v1",
                "queue.join.v1",
                "queue.leave.v1",
                "queue.list.v1",
                "queue.participants.v1",
                "queue.position.v1",
                "queue.shift.v1",
                "queue.update.v1",
            ]
        );
    }

    #[test]
    fn test_default_config_is_localhost() {
        let config = RpcServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9630);
    }
}
