//! Shared query parameter types for API handlers.

use serde::Deserialize;
use uniportal_core::types::DbId;

/// Optional `?course_id=` filter.
#[derive(Debug, Default, Deserialize)]
pub struct CourseFilterParams {
    pub course_id: Option<DbId>,
}
