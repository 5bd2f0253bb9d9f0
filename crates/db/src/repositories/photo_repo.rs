//! Repository for the `job_photos` table.

use sqlx::PgPool;

use atolye_core::types::DbId;

use crate::models::photo::{CreateJobPhoto, JobPhoto};

/// Column list for `job_photos` queries.
const COLUMNS: &str = "id, job_id, file_name, rel_path, uploaded_at";

/// Provides CRUD operations for photo references.
pub struct PhotoRepo;

impl PhotoRepo {
    /// Attach a photo reference to a job.
    pub async fn add(
        pool: &PgPool,
        job_id: DbId,
        input: &CreateJobPhoto,
    ) -> Result<JobPhoto, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_photos (job_id, file_name, rel_path) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobPhoto>(&query)
            .bind(job_id)
            .bind(&input.file_name)
            .bind(&input.rel_path)
            .fetch_one(pool)
            .await
    }

    /// List a job's photo references, oldest first.
    pub async fn list_by_job(pool: &PgPool, job_id: DbId) -> Result<Vec<JobPhoto>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM job_photos WHERE job_id = $1 ORDER BY uploaded_at, id");
        sqlx::query_as::<_, JobPhoto>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await
    }

    /// Delete a single photo reference. Returns `false` if it does not
    /// exist.
    pub async fn delete(pool: &PgPool, photo_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_photos WHERE id = $1")
            .bind(photo_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
