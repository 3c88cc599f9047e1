//! Versioned OBE grading configuration.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uniportal_core::grading::{GradeScale, GradeThreshold};
use uniportal_core::types::{DbId, Timestamp};

/// A row from the `obe_configs` table.
///
/// At most one row has `is_active = true`; see `ObeConfigRepo::activate`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ObeConfig {
    pub id: DbId,
    pub version: i32,
    pub name: String,
    pub grade_thresholds: Json<Vec<GradeThreshold>>,
    pub fallback_grade: String,
    pub pass_percentage: f64,
    pub is_active: bool,
    pub activated_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ObeConfig {
    pub fn scale(&self) -> GradeScale {
        GradeScale {
            thresholds: self.grade_thresholds.0.clone(),
            fallback_grade: self.fallback_grade.clone(),
            pass_percentage: self.pass_percentage,
        }
    }
}

/// DTO for creating a new configuration version.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateObeConfig {
    pub name: String,
    pub scale: GradeScale,
}
