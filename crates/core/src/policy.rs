//! Authorization policy for project mutation.
//!
//! A single predicate decides whether an actor may mutate a project. It is
//! invoked explicitly at the start of each mutating operation rather than
//! living in ambient middleware state, so the rule is testable in isolation.

use crate::roles::ROLE_ADMIN;
use crate::types::DbId;

/// The identity attached to an incoming request after token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The user's internal database id.
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"user"`).
    pub role: String,
}

impl Actor {
    /// Returns `true` if this actor carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// May `actor` mutate a project owned by `owner`?
///
/// Fails closed: an absent actor can never mutate. Admins may mutate any
/// project. Non-admins may mutate only projects they own; ownerless projects
/// are therefore admin-only.
pub fn can_modify(actor: Option<&Actor>, owner: Option<DbId>) -> bool {
    let Some(actor) = actor else {
        return false;
    };
    if actor.is_admin() {
        return true;
    }
    matches!(owner, Some(owner_id) if owner_id == actor.user_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::{ROLE_ADMIN, ROLE_USER};

    fn actor(user_id: DbId, role: &str) -> Actor {
        Actor {
            user_id,
            role: role.to_string(),
        }
    }

    #[test]
    fn test_absent_actor_is_denied() {
        assert!(!can_modify(None, Some(1)));
        assert!(!can_modify(None, None));
    }

    #[test]
    fn test_admin_may_modify_anything() {
        let admin = actor(7, ROLE_ADMIN);
        assert!(can_modify(Some(&admin), Some(1)));
        assert!(can_modify(Some(&admin), Some(7)));
        assert!(can_modify(Some(&admin), None));
    }

    #[test]
    fn test_owner_may_modify_own_project() {
        let owner = actor(3, ROLE_USER);
        assert!(can_modify(Some(&owner), Some(3)));
    }

    #[test]
    fn test_non_owner_is_denied() {
        let stranger = actor(4, ROLE_USER);
        assert!(!can_modify(Some(&stranger), Some(3)));
    }

    #[test]
    fn test_ownerless_project_is_admin_only() {
        let user = actor(5, ROLE_USER);
        assert!(!can_modify(Some(&user), None));
    }

    #[test]
    fn test_unknown_role_is_treated_as_non_admin() {
        let weird = actor(3, "superuser");
        // Still allowed on own project, but gets no admin privileges.
        assert!(can_modify(Some(&weird), Some(3)));
        assert!(!can_modify(Some(&weird), Some(9)));
    }
}
