//! Theory/lab marks model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uniportal_core::marks::{MarkTotals, TheoryLab};
use uniportal_core::types::{DbId, Timestamp};

/// A row from the `marks` table.
///
/// `obtained_marks` / `total_marks` are always recomputed from the theory
/// and lab parts when the row is written.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Marks {
    pub id: DbId,
    pub student_id: DbId,
    pub course_id: DbId,
    pub exam_type: String,
    pub theory_obtained: f64,
    pub theory_total: f64,
    pub lab_obtained: f64,
    pub lab_total: f64,
    pub obtained_marks: f64,
    pub total_marks: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Marks {
    pub fn totals(&self) -> MarkTotals {
        MarkTotals {
            obtained_marks: self.obtained_marks,
            total_marks: self.total_marks,
        }
    }
}

/// DTO for recording (insert or replace) marks for a student/course/exam.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordMarks {
    pub student_id: DbId,
    pub course_id: DbId,
    pub exam_type: String,
    pub theory_obtained: f64,
    pub theory_total: f64,
    pub lab_obtained: f64,
    pub lab_total: f64,
}

impl RecordMarks {
    pub fn parts(&self) -> TheoryLab {
        TheoryLab {
            theory_obtained: self.theory_obtained,
            theory_total: self.theory_total,
            lab_obtained: self.lab_obtained,
            lab_total: self.lab_total,
        }
    }
}
