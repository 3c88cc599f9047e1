//! Repository for the `plo_peo_mappings` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::mapping::{CreatePloPeoMapping, PloPeoMapping};

const COLUMNS: &str = "id, plo_id, peo_id, strength, created_at, updated_at";

/// Provides create/list/delete operations for PLO->PEO mappings.
pub struct PloPeoMappingRepo;

impl PloPeoMappingRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreatePloPeoMapping,
    ) -> Result<PloPeoMapping, sqlx::Error> {
        let query = format!(
            "INSERT INTO plo_peo_mappings (plo_id, peo_id, strength)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PloPeoMapping>(&query)
            .bind(input.plo_id)
            .bind(input.peo_id)
            .bind(input.strength.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool) -> Result<Vec<PloPeoMapping>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plo_peo_mappings ORDER BY plo_id, peo_id");
        sqlx::query_as::<_, PloPeoMapping>(&query)
            .fetch_all(pool)
            .await
    }

    /// Delete a mapping. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM plo_peo_mappings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
