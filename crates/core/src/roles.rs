//! Well-known role name constants.
//!
//! These are the values carried in the `role` claim of access tokens.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_FACULTY: &str = "faculty";
pub const ROLE_STUDENT: &str = "student";

/// All roles the portal recognises.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_FACULTY, ROLE_STUDENT];

/// Returns `true` for roles allowed to record marks and manage CLO mappings.
pub fn can_grade(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_FACULTY
}
