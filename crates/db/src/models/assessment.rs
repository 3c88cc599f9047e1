//! Assessment model: a student's exam in a course, split into components.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::attainment::ComponentScore;
use uniportal_core::types::{DbId, Timestamp};

/// A row from the `assessments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assessment {
    pub id: DbId,
    pub student_id: DbId,
    pub course_id: DbId,
    pub exam_type: String,
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `assessment_components` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssessmentComponent {
    pub id: DbId,
    pub assessment_id: DbId,
    pub component: String,
    pub clo_id: Option<DbId>,
    pub obtained: f64,
    pub out_of: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl AssessmentComponent {
    pub fn score(&self) -> ComponentScore {
        ComponentScore {
            component: self.component.clone(),
            clo_id: self.clo_id,
            obtained: self.obtained,
            out_of: self.out_of,
        }
    }
}

/// A component joined with the student whose assessment it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct StudentComponent {
    pub student_id: DbId,
    #[sqlx(flatten)]
    pub component: AssessmentComponent,
}

/// An assessment together with its components.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    pub components: Vec<AssessmentComponent>,
}

/// Key of the assessment being recorded.
#[derive(Debug, Clone)]
pub struct RecordAssessment {
    pub student_id: DbId,
    pub course_id: DbId,
    pub exam_type: String,
}

/// One component to store with an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewComponent {
    pub component: String,
    pub clo_id: Option<DbId>,
    pub obtained: f64,
    pub out_of: f64,
}

impl NewComponent {
    pub fn score(&self) -> ComponentScore {
        ComponentScore {
            component: self.component.clone(),
            clo_id: self.clo_id,
            obtained: self.obtained,
            out_of: self.out_of,
        }
    }
}
