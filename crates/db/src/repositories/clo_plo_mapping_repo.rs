//! Repository for the `clo_plo_mappings` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::mapping::{CloPloMapping, CreateCloPloMapping};

const COLUMNS: &str = "id, clo_id, plo_id, strength, created_at, updated_at";

/// Provides create/list/delete operations for CLO->PLO mappings.
pub struct CloPloMappingRepo;

impl CloPloMappingRepo {
    /// Insert a mapping. A duplicate `(clo_id, plo_id)` pair violates
    /// `uq_clo_plo_mappings_pair`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCloPloMapping,
    ) -> Result<CloPloMapping, sqlx::Error> {
        let query = format!(
            "INSERT INTO clo_plo_mappings (clo_id, plo_id, strength)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CloPloMapping>(&query)
            .bind(input.clo_id)
            .bind(input.plo_id)
            .bind(input.strength.as_str())
            .fetch_one(pool)
            .await
    }

    /// All mappings, ordered for stable output.
    pub async fn list(pool: &PgPool) -> Result<Vec<CloPloMapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clo_plo_mappings ORDER BY clo_id, plo_id");
        sqlx::query_as::<_, CloPloMapping>(&query)
            .fetch_all(pool)
            .await
    }

    /// Mappings whose CLO belongs to `course_id`.
    pub async fn list_by_course(
        pool: &PgPool,
        course_id: DbId,
    ) -> Result<Vec<CloPloMapping>, sqlx::Error> {
        sqlx::query_as::<_, CloPloMapping>(
            "SELECT m.id, m.clo_id, m.plo_id, m.strength, m.created_at, m.updated_at
             FROM clo_plo_mappings m
             JOIN clos c ON c.id = m.clo_id
             WHERE c.course_id = $1
             ORDER BY m.clo_id, m.plo_id",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
    }

    /// Delete a mapping. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM clo_plo_mappings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
