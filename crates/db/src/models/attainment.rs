//! Derived CLO attainment rows and rollup scopes.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::attainment::attainment_percent;
use uniportal_core::error::ObeError;
use uniportal_core::types::{DbId, Timestamp};

/// A row from the `attainments` table: one (student, course, CLO) triple.
///
/// The percentage is computed on read via [`Attainment::percent`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Attainment {
    pub id: DbId,
    pub student_id: DbId,
    pub course_id: DbId,
    pub clo_id: DbId,
    pub obtained: f64,
    pub total: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Attainment {
    pub fn percent(&self) -> Result<f64, ObeError> {
        attainment_percent(self.obtained, self.total)
    }
}

/// Filter selecting which attainment rows feed a rollup.
///
/// All set fields must match; an empty scope covers every row.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttainmentScope {
    pub course_id: Option<DbId>,
    pub batch: Option<String>,
    pub student_id: Option<DbId>,
}
