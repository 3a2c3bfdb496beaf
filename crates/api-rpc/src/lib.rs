//! JSON-RPC API Layer
//!
//! Implements the JSON-RPC 2.0 surface of the Waitlist queue service.

pub mod auth;
pub mod error;
pub mod handler;
mod rate_limiter;
pub mod server;
pub mod types;

pub use auth::{Claims, JwtAccessBoundary};
pub use handler::RateLimitConfig;
pub use server::{RpcServer, RpcServerConfig};

// Returned by `RpcServer::start`
pub use jsonrpsee::server::ServerHandle;
