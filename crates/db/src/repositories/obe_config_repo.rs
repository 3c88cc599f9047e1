//! Repository for the `obe_configs` table.
//!
//! At most one configuration is active at a time. Activation runs in a
//! transaction holding [`ACTIVATION_LOCK_KEY`] so concurrent activations
//! serialize; the partial unique index `uq_obe_configs_active` rejects
//! anything that slips past.

use sqlx::types::Json;
use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::obe_config::{CreateObeConfig, ObeConfig};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, version, name, grade_thresholds, fallback_grade, pass_percentage, \
    is_active, activated_at, created_at, updated_at";

/// Advisory lock key held while changing which configuration is active.
pub const ACTIVATION_LOCK_KEY: i64 = 0x4f42_4543_4647;

/// Provides versioned storage and activation of OBE configurations.
pub struct ObeConfigRepo;

impl ObeConfigRepo {
    /// Store a new configuration as the next version.
    ///
    /// With `activate` set it becomes the active configuration in the same
    /// transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateObeConfig,
        activate: bool,
    ) -> Result<ObeConfig, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_activation(&mut tx).await?;

        let query = format!(
            "INSERT INTO obe_configs (version, name, grade_thresholds, fallback_grade, pass_percentage)
             SELECT COALESCE(MAX(version), 0) + 1, $1, $2, $3, $4 FROM obe_configs
             RETURNING {COLUMNS}"
        );
        let mut config = sqlx::query_as::<_, ObeConfig>(&query)
            .bind(&input.name)
            .bind(Json(&input.scale.thresholds))
            .bind(&input.scale.fallback_grade)
            .bind(input.scale.pass_percentage)
            .fetch_one(&mut *tx)
            .await?;

        if activate {
            config = Self::activate_inner(&mut tx, config.id)
                .await?
                .ok_or(sqlx::Error::RowNotFound)?;
        }

        tx.commit().await?;
        Ok(config)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ObeConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM obe_configs WHERE id = $1");
        sqlx::query_as::<_, ObeConfig>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All versions, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<ObeConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM obe_configs ORDER BY version DESC");
        sqlx::query_as::<_, ObeConfig>(&query).fetch_all(pool).await
    }

    /// The active configuration, if any.
    pub async fn find_active(pool: &PgPool) -> Result<Option<ObeConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM obe_configs WHERE is_active");
        sqlx::query_as::<_, ObeConfig>(&query)
            .fetch_optional(pool)
            .await
    }

    /// Make `id` the only active configuration.
    ///
    /// Returns `None` (and changes nothing) if no row with `id` exists.
    /// Activating the already-active configuration refreshes `activated_at`.
    pub async fn activate(pool: &PgPool, id: DbId) -> Result<Option<ObeConfig>, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::lock_activation(&mut tx).await?;

        let activated = Self::activate_inner(&mut tx, id).await?;
        if activated.is_some() {
            tx.commit().await?;
        }
        Ok(activated)
    }

    /// Number of active rows. Always 0 or 1.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM obe_configs WHERE is_active")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    async fn lock_activation(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACTIVATION_LOCK_KEY)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    /// Deactivate every other row, then activate `id`. Caller holds the lock.
    async fn activate_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<Option<ObeConfig>, sqlx::Error> {
        let exists: Option<(DbId,)> = sqlx::query_as("SELECT id FROM obe_configs WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?;
        if exists.is_none() {
            return Ok(None);
        }

        let deactivated =
            sqlx::query("UPDATE obe_configs SET is_active = false WHERE is_active AND id <> $1")
                .bind(id)
                .execute(&mut **tx)
                .await?
                .rows_affected();
        tracing::debug!(config_id = id, deactivated, "Switching active OBE config");

        let query = format!(
            "UPDATE obe_configs SET is_active = true, activated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ObeConfig>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }
}
