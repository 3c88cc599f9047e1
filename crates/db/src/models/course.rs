//! Course entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::types::{DbId, Timestamp};

/// A course row from the `courses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Course {
    pub id: DbId,
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    pub semester: i32,
    pub instructor: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new course.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCourse {
    pub code: String,
    pub title: String,
    pub credit_hours: i32,
    pub semester: i32,
    pub instructor: Option<String>,
}

/// DTO for updating an existing course. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCourse {
    pub title: Option<String>,
    pub credit_hours: Option<i32>,
    pub semester: Option<i32>,
    pub instructor: Option<String>,
}
