//! Repository for the `peos` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::outcome::{CreatePeo, Peo};

const COLUMNS: &str = "id, peo_code, title, description, created_at, updated_at";

/// Provides create/read operations for program educational objectives.
pub struct PeoRepo;

impl PeoRepo {
    pub async fn create(pool: &PgPool, input: &CreatePeo) -> Result<Peo, sqlx::Error> {
        let query = format!(
            "INSERT INTO peos (peo_code, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Peo>(&query)
            .bind(&input.peo_code)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Peo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM peos WHERE id = $1");
        sqlx::query_as::<_, Peo>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all PEOs ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Peo>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM peos ORDER BY peo_code ASC");
        sqlx::query_as::<_, Peo>(&query).fetch_all(pool).await
    }
}
