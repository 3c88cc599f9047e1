//! Repository for the `clos` table.

use sqlx::PgPool;
use uniportal_core::outcome::STRENGTH_STRONG;
use uniportal_core::types::DbId;

use crate::models::outcome::{Clo, CreateClo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, course_id, clo_code, description, max_marks, plo_id, created_at, updated_at";

/// Provides CRUD operations for course learning outcomes.
pub struct CloRepo;

impl CloRepo {
    /// Insert a new CLO and a strong mapping to its primary PLO.
    ///
    /// Both rows are written in one transaction so the rollup graph always
    /// contains the CLO's primary edge.
    pub async fn create(pool: &PgPool, input: &CreateClo) -> Result<Clo, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO clos (course_id, clo_code, description, max_marks, plo_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let clo = sqlx::query_as::<_, Clo>(&query)
            .bind(input.course_id)
            .bind(&input.clo_code)
            .bind(&input.description)
            .bind(input.max_marks)
            .bind(input.plo_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO clo_plo_mappings (clo_id, plo_id, strength)
             VALUES ($1, $2, $3)
             ON CONFLICT ON CONSTRAINT uq_clo_plo_mappings_pair DO NOTHING",
        )
        .bind(clo.id)
        .bind(clo.plo_id)
        .bind(STRENGTH_STRONG)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(clo)
    }

    /// Find a CLO by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Clo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clos WHERE id = $1");
        sqlx::query_as::<_, Clo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List the CLOs of a course ordered by code.
    pub async fn list_by_course(pool: &PgPool, course_id: DbId) -> Result<Vec<Clo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clos WHERE course_id = $1 ORDER BY clo_code ASC");
        sqlx::query_as::<_, Clo>(&query)
            .bind(course_id)
            .fetch_all(pool)
            .await
    }

    /// Same as [`list_by_course`](Self::list_by_course), inside a transaction.
    pub async fn list_by_course_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        course_id: DbId,
    ) -> Result<Vec<Clo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clos WHERE course_id = $1 ORDER BY clo_code ASC");
        sqlx::query_as::<_, Clo>(&query)
            .bind(course_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// List all CLOs ordered by course then code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Clo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clos ORDER BY course_id ASC, clo_code ASC");
        sqlx::query_as::<_, Clo>(&query).fetch_all(pool).await
    }
}
