//! Learning outcome models: PEOs, PLOs and CLOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::attainment::CloDefinition;
use uniportal_core::types::{DbId, Timestamp};

/// A program educational objective from the `peos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Peo {
    pub id: DbId,
    pub peo_code: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePeo {
    pub peo_code: String,
    pub title: String,
    pub description: Option<String>,
}

/// A program learning outcome from the `plos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Plo {
    pub id: DbId,
    pub plo_code: String,
    pub title: String,
    pub description: Option<String>,
    pub peo_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePlo {
    pub plo_code: String,
    pub title: String,
    pub description: Option<String>,
    pub peo_id: Option<DbId>,
}

/// A course learning outcome from the `clos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Clo {
    pub id: DbId,
    pub course_id: DbId,
    pub clo_code: String,
    pub description: Option<String>,
    pub max_marks: f64,
    /// The PLO this CLO primarily supports.
    pub plo_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Clo {
    pub fn definition(&self) -> CloDefinition {
        CloDefinition {
            clo_id: self.id,
            max_marks: self.max_marks,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClo {
    pub course_id: DbId,
    pub clo_code: String,
    pub description: Option<String>,
    pub max_marks: f64,
    pub plo_id: DbId,
}
