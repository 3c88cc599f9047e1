//! Repository for the `students` table.

use sqlx::PgPool;
use uniportal_core::types::DbId;

use crate::models::student::{CreateStudent, Student};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, registration_no, name, batch, program, created_at, updated_at";

/// Provides CRUD operations for students.
pub struct StudentRepo;

impl StudentRepo {
    /// Insert a new student, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateStudent) -> Result<Student, sqlx::Error> {
        let query = format!(
            "INSERT INTO students (registration_no, name, batch, program)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(&input.registration_no)
            .bind(&input.name)
            .bind(&input.batch)
            .bind(&input.program)
            .fetch_one(pool)
            .await
    }

    /// Find a student by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Student>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a student with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM students WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Lock a student row until the transaction ends.
    ///
    /// Writers that derive rows from everything a student has recorded take
    /// this first, so each one reads the components the previous one
    /// committed. `FOR NO KEY UPDATE` leaves foreign-key checks from other
    /// inserts unblocked. Returns `false` if the student does not exist.
    pub async fn lock_tx(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM students WHERE id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(&mut **tx)
                .await?;
        Ok(row.is_some())
    }

    /// List the students of one batch ordered by registration number.
    pub async fn list_by_batch(pool: &PgPool, batch: &str) -> Result<Vec<Student>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM students WHERE batch = $1 ORDER BY registration_no ASC"
        );
        sqlx::query_as::<_, Student>(&query)
            .bind(batch)
            .fetch_all(pool)
            .await
    }
}
