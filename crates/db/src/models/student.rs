//! Student entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::types::{DbId, Timestamp};

/// A student row from the `students` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Student {
    pub id: DbId,
    pub registration_no: String,
    pub name: String,
    /// Intake year, e.g. `"2022"`. Used as a rollup scope.
    pub batch: String,
    pub program: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new student.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateStudent {
    pub registration_no: String,
    pub name: String,
    pub batch: String,
    pub program: String,
}
