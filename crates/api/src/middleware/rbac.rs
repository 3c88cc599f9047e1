//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! meet the minimum requirement.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uniportal_core::error::CoreError;
use uniportal_core::roles::{can_grade, ROLE_ADMIN};
use uniportal_core::types::DbId;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires `faculty` or `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireFaculty(pub AuthUser);

impl FromRequestParts<AppState> for RequireFaculty {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !can_grade(&user.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "Faculty or Admin role required".into(),
            )));
        }
        Ok(RequireFaculty(user))
    }
}

/// Requires any authenticated caller (any valid role).
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Students may only read their own records; staff may read anyone's.
pub fn ensure_student_access(user: &AuthUser, student_id: DbId) -> Result<(), AppError> {
    if user.is_student() && user.user_id != student_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Students may only access their own records".into(),
        )));
    }
    Ok(())
}
