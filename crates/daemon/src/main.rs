//! Waitlist Daemon - Main Entry Point

mod config;
mod telemetry;

use anyhow::{Context, Result};
use config::DaemonConfig;
use std::sync::Arc;
use tracing::info;

use waitlist_api_rpc::{JwtAccessBoundary, RpcServer};
use waitlist_core::application::QueueService;
use waitlist_core::port::SystemTimeProvider;
use waitlist_infra_sqlite::{
    busy_timeout_for, create_pool_with, run_migrations, SqliteParticipantLedger,
    SqliteQueueRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration (fails fast on a missing secret)
    let config = DaemonConfig::from_env()?;

    // 2. Logging
    let _telemetry = telemetry::init(config.log_format)?;
    info!("Waitlist daemon v{} starting...", waitlist_core::VERSION);

    // 3. Database
    if let Some(parent) = config.db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create {}", parent.display()))?;
    }
    info!(db_path = %config.db_path.display(), "Initializing database...");

    let busy_timeout = busy_timeout_for(config.operation_timeout);
    let pool = create_pool_with(&config.database_url(), busy_timeout)
        .await
        .map_err(|e| anyhow::anyhow!("DB pool creation failed: {}", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;

    // 4. Dependency wiring
    let service = Arc::new(QueueService::new(
        Arc::new(SqliteQueueRepository::new(pool.clone())),
        Arc::new(SqliteParticipantLedger::new(pool.clone())),
        Arc::new(SystemTimeProvider),
        config.queue_policy(),
    ));
    let access = Arc::new(JwtAccessBoundary::new(&config.jwt_secret));

    // 5. JSON-RPC server
    let (rpc_handle, addr) = RpcServer::new(config.rpc_server(), service, access)
        .start()
        .await
        .context("RPC server start failed")?;

    info!(addr = %addr, "System ready");
    info!("Press Ctrl+C to shutdown");

    // 6. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutdown signal received. Exiting gracefully...");

    rpc_handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    rpc_handle.stopped().await;
    pool.close().await;

    info!("Shutdown complete.");
    Ok(())
}
