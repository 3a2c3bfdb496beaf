//! Daemon configuration, read once from the environment and passed down.

use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use waitlist_api_rpc::{RateLimitConfig, RpcServerConfig};
use waitlist_core::application::QueuePolicy;

const DEFAULT_DB_PATH: &str = "~/.waitlist/waitlist.db";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;
const DEFAULT_QUEUE_HOURS: i64 = 5;
const DEFAULT_OP_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_RATE_LIMIT_BURST: u32 = 20;
const DEFAULT_RATE_LIMIT_RATE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub db_path: PathBuf,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub jwt_secret: String,
    pub default_queue_hours: i64,
    pub operation_timeout: Duration,
    pub rate_limit: RateLimitConfig,
    pub log_format: LogFormat,
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup (the environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_path = lookup("WAITLIST_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let db_path = PathBuf::from(shellexpand::tilde(&db_path).into_owned());

        let jwt_secret = lookup("WAITLIST_JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("WAITLIST_JWT_SECRET must be set"))?;

        let default_queue_hours = parse_or(&lookup, "WAITLIST_DEFAULT_QUEUE_HOURS", DEFAULT_QUEUE_HOURS)?;
        if default_queue_hours <= 0 {
            return Err(anyhow!(
                "WAITLIST_DEFAULT_QUEUE_HOURS must be positive, got {}",
                default_queue_hours
            ));
        }

        let log_format = match lookup("WAITLIST_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            db_path,
            rpc_host: lookup("WAITLIST_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port: parse_or(&lookup, "WAITLIST_RPC_PORT", DEFAULT_RPC_PORT)?,
            jwt_secret,
            default_queue_hours,
            operation_timeout: Duration::from_millis(parse_or(
                &lookup,
                "WAITLIST_OP_TIMEOUT_MS",
                DEFAULT_OP_TIMEOUT_MS,
            )?),
            rate_limit: RateLimitConfig {
                max_burst: parse_or(&lookup, "WAITLIST_RATE_LIMIT_BURST", DEFAULT_RATE_LIMIT_BURST)?,
                rate_per_sec: parse_or(&lookup, "WAITLIST_RATE_LIMIT_RATE", DEFAULT_RATE_LIMIT_RATE)?,
            },
            log_format,
        })
    }

    pub fn database_url(&self) -> String {
        format!("sqlite://{}", self.db_path.display())
    }

    pub fn queue_policy(&self) -> QueuePolicy {
        QueuePolicy {
            default_duration_hours: self.default_queue_hours,
            operation_timeout: self.operation_timeout,
        }
    }

    pub fn rpc_server(&self) -> RpcServerConfig {
        RpcServerConfig {
            host: self.rpc_host.clone(),
            port: self.rpc_port,
            rate_limit: self.rate_limit,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid value for {}: {:?}", key, raw)),
        None => Ok(default),
    }
}
