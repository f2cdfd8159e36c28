//! Well-known role name constants.
//!
//! These must match the values accepted by the `users.role` column.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// Returns `true` if `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_USER
}
