//! RPC Error Types
//!
//! Maps application errors to JSON-RPC error codes.

use jsonrpsee::types::ErrorObjectOwned;
use serde::Serialize;
use thiserror::Error;
use waitlist_core::error::AppError;

/// RPC Error Codes
pub mod code {
    pub const VALIDATION_ERROR: i32 = 4000;
    pub const NOT_FOUND: i32 = 4001;
    pub const CONFLICT: i32 = 4002;
    pub const THROTTLED: i32 = 4003;
    pub const ALREADY_JOINED: i32 = 4004;
    pub const FORBIDDEN: i32 = 4005;
    pub const UNAUTHORIZED: i32 = 4006;
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const DB_ERROR: i32 = 5001;
    pub const TIMEOUT: i32 = 5003;
}

/// Structured payload for `ALREADY_JOINED`
#[derive(Debug, Serialize)]
struct AlreadyJoinedData {
    queue_id: i64,
    user_id: i64,
}

/// Convert AppError to JSON-RPC ErrorObject
pub fn to_rpc_error(err: AppError) -> ErrorObjectOwned {
    match err {
        AppError::Validation(msg) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, msg, None::<()>)
        }
        AppError::Domain(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::Serialization(e) => {
            ErrorObjectOwned::owned(code::VALIDATION_ERROR, e.to_string(), None::<()>)
        }
        AppError::NotFound(msg) => ErrorObjectOwned::owned(code::NOT_FOUND, msg, None::<()>),
        AppError::AlreadyJoined { queue_id, user_id } => ErrorObjectOwned::owned(
            code::ALREADY_JOINED,
            format!("User {} is already in queue {}", user_id, queue_id),
            Some(AlreadyJoinedData { queue_id, user_id }),
        ),
        AppError::Forbidden(msg) => ErrorObjectOwned::owned(code::FORBIDDEN, msg, None::<()>),
        AppError::Unauthorized(msg) => {
            ErrorObjectOwned::owned(code::UNAUTHORIZED, msg, None::<()>)
        }
        AppError::Conflict(msg) => ErrorObjectOwned::owned(code::CONFLICT, msg, None::<()>),
        AppError::Database(msg) => ErrorObjectOwned::owned(code::DB_ERROR, msg, None::<()>),
        AppError::Timeout(msg) => ErrorObjectOwned::owned(code::TIMEOUT, msg, None::<()>),
        AppError::Io(e) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, e.to_string(), None::<()>),
        AppError::Config(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
        AppError::Internal(msg) => ErrorObjectOwned::owned(code::INTERNAL_ERROR, msg, None::<()>),
    }
}

/// Caller exceeded the per-user request budget
pub fn throttled() -> ErrorObjectOwned {
    ErrorObjectOwned::owned(
        code::THROTTLED,
        "Rate limit exceeded. Please slow down.",
        None::<()>,
    )
}

/// Failures while bringing the RPC server up
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to build server on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to register method: {0}")]
    Register(#[from] jsonrpsee::core::RegisterMethodError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_errors_keep_distinct_codes() {
        let already = to_rpc_error(AppError::AlreadyJoined {
            queue_id: 1,
            user_id: 10,
        });
        assert_eq!(already.code(), code::ALREADY_JOINED);
        assert_eq!(already.message(), "User 10 is already in queue 1");
        assert!(already.data().is_some());

        let missing = to_rpc_error(AppError::NotFound("Queue 1 not found".into()));
        assert_eq!(missing.code(), code::NOT_FOUND);
    }

    #[test]
    fn test_access_errors() {
        assert_eq!(
            to_rpc_error(AppError::Forbidden("shift".into())).code(),
            code::FORBIDDEN
        );
        assert_eq!(
            to_rpc_error(AppError::Unauthorized("expired".into())).code(),
            code::UNAUTHORIZED
        );
    }

    #[test]
    fn test_server_side_errors() {
        assert_eq!(
            to_rpc_error(AppError::Database("disk I/O error".into())).code(),
            code::DB_ERROR
        );
        assert_eq!(
            to_rpc_error(AppError::Timeout("join: exceeded 5000 ms".into())).code(),
            code::TIMEOUT
        );
        assert_eq!(throttled().code(), code::THROTTLED);
    }
}
