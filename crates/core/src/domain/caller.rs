// Caller identity as resolved by the access boundary

use crate::domain::UserId;
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// Authenticated caller: trusted as given, never re-derived here
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: UserId,
    pub is_admin: bool,
}

impl Caller {
    pub fn new(user_id: UserId, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }

    pub fn user(user_id: UserId) -> Self {
        Self::new(user_id, false)
    }

    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, true)
    }

    /// Gate for admin-only actions; checked before any mutation
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "{} requires admin access (user {})",
                action, self.user_id
            )))
        }
    }

    /// Resolve whose membership a request targets.
    ///
    /// Users act for themselves; only admins may name someone else.
    pub fn acting_for(&self, target: Option<UserId>) -> Result<UserId> {
        match target {
            None => Ok(self.user_id),
            Some(id) if id == self.user_id => Ok(id),
            Some(id) => {
                self.require_admin("acting for another user")?;
                Ok(id)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(Caller::admin(1).require_admin("shift").is_ok());
        let err = Caller::user(2).require_admin("shift").unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_acting_for() {
        assert_eq!(Caller::user(7).acting_for(None).unwrap(), 7);
        assert_eq!(Caller::user(7).acting_for(Some(7)).unwrap(), 7);
        assert!(Caller::user(7).acting_for(Some(8)).is_err());
        assert_eq!(Caller::admin(1).acting_for(Some(8)).unwrap(), 8);
    }
}
