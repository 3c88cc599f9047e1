//! Repository for the `courses` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::course::{Course, CreateCourse, UpdateCourse};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, code, title, credit_hours, semester, instructor, created_at, updated_at";

/// Result of [`CourseRepo::delete_if_unreferenced`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CourseDeletion {
    Deleted,
    NotFound,
    /// The course still owns this many CLOs and was left in place.
    HasClos(i64),
}

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a new course, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateCourse) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses (code, title, credit_hours, semester, instructor)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(&input.code)
            .bind(&input.title)
            .bind(input.credit_hours)
            .bind(input.semester)
            .bind(&input.instructor)
            .fetch_one(pool)
            .await
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update a course. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCourse,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET
                title = COALESCE($2, title),
                credit_hours = COALESCE($3, credit_hours),
                semester = COALESCE($4, semester),
                instructor = COALESCE($5, instructor)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.credit_hours)
            .bind(input.semester)
            .bind(&input.instructor)
            .fetch_optional(pool)
            .await
    }

    /// Delete a course unless it still owns CLOs.
    ///
    /// The course row is locked for the duration of the check so a CLO
    /// cannot be added between the count and the delete.
    pub async fn delete_if_unreferenced(
        pool: &PgPool,
        id: DbId,
    ) -> Result<CourseDeletion, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(CourseDeletion::NotFound);
        }

        let (clo_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM clos WHERE course_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;
        if clo_count > 0 {
            return Ok(CourseDeletion::HasClos(clo_count));
        }

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(CourseDeletion::Deleted)
    }
}
