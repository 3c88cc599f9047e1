//! Repository for the `assessments` and `assessment_components` tables.
//!
//! Writes go through `_tx` methods: recording an assessment replaces its
//! components and refreshes the derived attainment rows, and the handler
//! runs all of that in one transaction.

use sqlx::PgPool;
use uniportal_core::marks::MarkTotals;
use uniportal_core::types::DbId;

use crate::models::assessment::{
    Assessment, AssessmentComponent, AssessmentDetail, NewComponent, RecordAssessment,
    StudentComponent,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, student_id, course_id, exam_type, obtained_marks, total_marks, created_at, updated_at";

const COMPONENT_COLUMNS: &str =
    "id, assessment_id, component, clo_id, obtained, out_of, created_at, updated_at";

/// Provides write and lookup operations for assessments.
pub struct AssessmentRepo;

impl AssessmentRepo {
    /// Insert an assessment, or overwrite the totals of the existing one for
    /// the same student/course/exam.
    pub async fn upsert_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        key: &RecordAssessment,
        totals: MarkTotals,
    ) -> Result<Assessment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assessments (student_id, course_id, exam_type, obtained_marks, total_marks)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT ON CONSTRAINT uq_assessments_student_course_exam DO UPDATE SET
                obtained_marks = EXCLUDED.obtained_marks,
                total_marks = EXCLUDED.total_marks
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assessment>(&query)
            .bind(key.student_id)
            .bind(key.course_id)
            .bind(&key.exam_type)
            .bind(totals.obtained_marks)
            .bind(totals.total_marks)
            .fetch_one(&mut **tx)
            .await
    }

    /// Replace every component of an assessment.
    pub async fn replace_components_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        assessment_id: DbId,
        components: &[NewComponent],
    ) -> Result<Vec<AssessmentComponent>, sqlx::Error> {
        sqlx::query("DELETE FROM assessment_components WHERE assessment_id = $1")
            .bind(assessment_id)
            .execute(&mut **tx)
            .await?;

        if components.is_empty() {
            return Ok(vec![]);
        }

        let names: Vec<String> = components.iter().map(|c| c.component.clone()).collect();
        let clo_ids: Vec<Option<DbId>> = components.iter().map(|c| c.clo_id).collect();
        let obtained: Vec<f64> = components.iter().map(|c| c.obtained).collect();
        let out_of: Vec<f64> = components.iter().map(|c| c.out_of).collect();

        let query = format!(
            "INSERT INTO assessment_components (assessment_id, component, clo_id, obtained, out_of) \
             SELECT $1::bigint, * FROM UNNEST($2::text[], $3::bigint[], $4::float8[], $5::float8[]) \
             RETURNING {COMPONENT_COLUMNS}"
        );
        let mut rows = sqlx::query_as::<_, AssessmentComponent>(&query)
            .bind(assessment_id)
            .bind(&names)
            .bind(&clo_ids)
            .bind(&obtained)
            .bind(&out_of)
            .fetch_all(&mut **tx)
            .await?;
        rows.sort_by_key(|c| c.id);
        Ok(rows)
    }

    /// Every component of every assessment a student has in a course.
    pub async fn components_for_student_course_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<AssessmentComponent>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentComponent>(COMPONENTS_FOR_STUDENT_COURSE)
            .bind(student_id)
            .bind(course_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Same as [`components_for_student_course_tx`](Self::components_for_student_course_tx)
    /// outside a transaction.
    pub async fn components_for_student_course(
        pool: &PgPool,
        student_id: DbId,
        course_id: DbId,
    ) -> Result<Vec<AssessmentComponent>, sqlx::Error> {
        sqlx::query_as::<_, AssessmentComponent>(COMPONENTS_FOR_STUDENT_COURSE)
            .bind(student_id)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Every component recorded in a course, tagged with its student,
    /// ordered by student.
    pub async fn components_for_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<StudentComponent>, sqlx::Error> {
        sqlx::query_as::<_, StudentComponent>(
            "SELECT a.student_id, c.id, c.assessment_id, c.component, c.clo_id, \
                    c.obtained, c.out_of, c.created_at, c.updated_at \
             FROM assessment_components c \
             JOIN assessments a ON a.id = c.assessment_id \
             WHERE a.course_id = $1 \
             ORDER BY a.student_id, c.id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Assessment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assessments WHERE id = $1");
        sqlx::query_as::<_, Assessment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// An assessment together with its components.
    pub async fn find_detail(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssessmentDetail>, sqlx::Error> {
        let Some(assessment) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        let components = Self::list_components(pool, id).await?;
        Ok(Some(AssessmentDetail {
            assessment,
            components,
        }))
    }

    pub async fn list_components(
        pool: &PgPool,
        assessment_id: DbId,
    ) -> Result<Vec<AssessmentComponent>, sqlx::Error> {
        let query = format!(
            "SELECT {COMPONENT_COLUMNS} FROM assessment_components \
             WHERE assessment_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, AssessmentComponent>(&query)
            .bind(assessment_id)
            .fetch_all(pool)
            .await
    }

    /// All assessments of one student, ordered by course then exam.
    pub async fn list_by_student(
        pool: &PgPool,
        student_id: DbId,
    ) -> Result<Vec<Assessment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assessments WHERE student_id = $1 ORDER BY course_id, exam_type"
        );
        sqlx::query_as::<_, Assessment>(&query)
            .bind(student_id)
            .fetch_all(pool)
            .await
    }
}

const COMPONENTS_FOR_STUDENT_COURSE: &str = "\
    SELECT c.id, c.assessment_id, c.component, c.clo_id, c.obtained, c.out_of, \
           c.created_at, c.updated_at \
    FROM assessment_components c \
    JOIN assessments a ON a.id = c.assessment_id \
    WHERE a.student_id = $1 AND a.course_id = $2 \
    ORDER BY c.id";
