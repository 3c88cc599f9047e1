//! Repository for the derived `attainments` table.

use sqlx::PgPool;
use uniportal_core::attainment::CloMarks;
use uniportal_core::types::DbId;

use crate::models::attainment::{Attainment, AttainmentScope};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, student_id, course_id, clo_id, obtained, total, created_at, updated_at";

/// Same columns qualified with the `a` alias for joined queries.
const SCOPED_COLUMNS: &str = "a.id, a.student_id, a.course_id, a.clo_id, a.obtained, a.total, \
    a.created_at, a.updated_at";

/// Provides write and scoped-read operations for attainment rows.
pub struct AttainmentRepo;

impl AttainmentRepo {
    /// Write one row per CLO for a student in a course, replacing any
    /// existing obtained/total pair.
    pub async fn upsert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        student_id: DbId,
        course_id: DbId,
        marks: &[CloMarks],
    ) -> Result<Vec<Attainment>, sqlx::Error> {
        if marks.is_empty() {
            return Ok(vec![]);
        }

        let clo_ids: Vec<DbId> = marks.iter().map(|m| m.clo_id).collect();
        let obtained: Vec<f64> = marks.iter().map(|m| m.obtained).collect();
        let totals: Vec<f64> = marks.iter().map(|m| m.total).collect();

        let query = format!(
            "INSERT INTO attainments (student_id, course_id, clo_id, obtained, total) \
             SELECT $1::bigint, $2::bigint, * FROM UNNEST($3::bigint[], $4::float8[], $5::float8[]) \
             ON CONFLICT ON CONSTRAINT uq_attainments_student_course_clo DO UPDATE SET \
                obtained = EXCLUDED.obtained, \
                total = EXCLUDED.total \
             RETURNING {COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, Attainment>(&query)
            .bind(student_id)
            .bind(course_id)
            .bind(&clo_ids)
            .bind(&obtained)
            .bind(&totals)
            .fetch_all(&mut **tx)
            .await?;
        rows.sort_by_key(|a| a.clo_id);
        Ok(rows)
    }

    /// Rows matching every field set in `scope`.
    ///
    /// `batch` is resolved through the owning student.
    pub async fn list_in_scope(
        pool: &PgPool,
        scope: &AttainmentScope,
    ) -> Result<Vec<Attainment>, sqlx::Error> {
        let query = format!(
            "SELECT {SCOPED_COLUMNS} FROM attainments a \
             JOIN students s ON s.id = a.student_id \
             WHERE ($1::BIGINT IS NULL OR a.course_id = $1) \
               AND ($2::TEXT IS NULL OR s.batch = $2) \
               AND ($3::BIGINT IS NULL OR a.student_id = $3) \
             ORDER BY a.student_id, a.course_id, a.clo_id"
        );
        sqlx::query_as::<_, Attainment>(&query)
            .bind(scope.course_id)
            .bind(&scope.batch)
            .bind(scope.student_id)
            .fetch_all(pool)
            .await
    }

    /// All rows for one student in one course.
    pub async fn list_by_student_course(
        pool: &PgPool,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<Attainment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attainments \
             WHERE student_id = $1 AND course_id = $2 ORDER BY clo_id"
        );
        sqlx::query_as::<_, Attainment>(&query)
            .bind(student_id)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }
}
