// Access Boundary Port (Interface)

use crate::domain::Caller;
use crate::error::Result;

/// Resolves a bearer credential into a caller identity.
///
/// Implementations fail with `AppError::Unauthorized` for missing,
/// malformed or expired credentials.
pub trait AccessBoundary: Send + Sync {
    fn resolve(&self, bearer_token: &str) -> Result<Caller>;
}
