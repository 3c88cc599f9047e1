//! Repository for the `plos` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::outcome::{CreatePlo, Plo};

const COLUMNS: &str = "id, plo_code, title, description, peo_id, created_at, updated_at";

/// Provides create/read operations for program learning outcomes.
pub struct PloRepo;

impl PloRepo {
    pub async fn create(pool: &PgPool, input: &CreatePlo) -> Result<Plo, sqlx::Error> {
        let query = format!(
            "INSERT INTO plos (plo_code, title, description, peo_id)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Plo>(&query)
            .bind(&input.plo_code)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.peo_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Plo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plos WHERE id = $1");
        sqlx::query_as::<_, Plo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all PLOs ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Plo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM plos ORDER BY plo_code ASC");
        sqlx::query_as::<_, Plo>(&query).fetch_all(pool).await
    }
}
