//! Repository for the `marks` table.

use sqlx::PgPool;
use uniportal_core::marks::MarkTotals;
use uniportal_core::types::DbId;

use crate::models::marks::{Marks, RecordMarks};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, student_id, course_id, exam_type, \
    theory_obtained, theory_total, lab_obtained, lab_total, \
    obtained_marks, total_marks, created_at, updated_at";

/// Provides write and lookup operations for theory/lab marks.
pub struct MarksRepo;

impl MarksRepo {
    /// Insert marks, or replace the existing row for the same
    /// student/course/exam. `totals` must come from
    /// `uniportal_core::marks::recompute_theory_lab`.
    pub async fn upsert(
        pool: &PgPool,
        input: &RecordMarks,
        totals: MarkTotals,
    ) -> Result<Marks, sqlx::Error> {
        let query = format!(
            "INSERT INTO marks (student_id, course_id, exam_type,
                theory_obtained, theory_total, lab_obtained, lab_total,
                obtained_marks, total_marks)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             ON CONFLICT ON CONSTRAINT uq_marks_student_course_exam DO UPDATE SET
                theory_obtained = EXCLUDED.theory_obtained,
                theory_total = EXCLUDED.theory_total,
                lab_obtained = EXCLUDED.lab_obtained,
                lab_total = EXCLUDED.lab_total,
                obtained_marks = EXCLUDED.obtained_marks,
                total_marks = EXCLUDED.total_marks
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Marks>(&query)
            .bind(input.student_id)
            .bind(input.course_id)
            .bind(&input.exam_type)
            .bind(input.theory_obtained)
            .bind(input.theory_total)
            .bind(input.lab_obtained)
            .bind(input.lab_total)
            .bind(totals.obtained_marks)
            .bind(totals.total_marks)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Marks>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM marks WHERE id = $1");
        sqlx::query_as::<_, Marks>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All marks of one student, ordered by course then exam.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Marks>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM marks WHERE student_id = $1 ORDER BY course_id, exam_type"
        );
        sqlx::query_as::<_, Marks>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }
}
