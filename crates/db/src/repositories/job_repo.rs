//! Repository for the `jobs` table.
//!
//! Status writes go through [`ServiceStatus`] so no handler ever touches
//! a raw status ID. Deleting a job is reserved for the archival engine;
//! `delete` here exists for intake mistakes only and refuses jobs that
//! already have operations.

use sqlx::PgPool;

use atolye_core::status::ServiceStatus;
use atolye_core::types::DbId;

use crate::models::job::{CreateJob, Job, JobListQuery, UpdateJob};

/// Column list for `jobs` queries.
const COLUMNS: &str = "\
    id, tracking_no, document_no, customer_name, product_model, \
    received_by, notes, status_id, parts_estimate, services_estimate, \
    received_at, created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides CRUD operations for live service jobs.
pub struct JobRepo;

impl JobRepo {
    /// Record a new job at intake. Starts in `Opened` status.
    pub async fn create(pool: &PgPool, input: &CreateJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs \
                 (tracking_no, document_no, customer_name, product_model, \
                  received_by, notes, status_id, parts_estimate, services_estimate) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(&input.tracking_no)
            .bind(input.document_no.as_deref().unwrap_or(""))
            .bind(&input.customer_name)
            .bind(input.product_model.as_deref().unwrap_or(""))
            .bind(input.received_by.as_deref().unwrap_or(""))
            .bind(&input.notes)
            .bind(ServiceStatus::Opened.id())
            .bind(input.parts_estimate)
            .bind(input.services_estimate)
            .fetch_one(pool)
            .await
    }

    /// Find a job by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List jobs with optional status filter and pagination, newest first.
    pub async fn list(pool: &PgPool, params: &JobListQuery) -> Result<Vec<Job>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        if let Some(status_id) = params.status_id {
            let query = format!(
                "SELECT {COLUMNS} FROM jobs WHERE status_id = $1 \
                 ORDER BY received_at DESC LIMIT $2 OFFSET $3"
            );
            sqlx::query_as::<_, Job>(&query)
                .bind(status_id)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM jobs \
                 ORDER BY received_at DESC LIMIT $1 OFFSET $2"
            );
            sqlx::query_as::<_, Job>(&query)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }

    /// Update a job's descriptive fields. Returns the updated row, or
    /// `None` if not found. Status is never written here.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateJob,
    ) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs SET \
                 document_no = COALESCE($2, document_no), \
                 customer_name = COALESCE($3, customer_name), \
                 product_model = COALESCE($4, product_model), \
                 received_by = COALESCE($5, received_by), \
                 notes = COALESCE($6, notes), \
                 parts_estimate = COALESCE($7, parts_estimate), \
                 services_estimate = COALESCE($8, services_estimate), \
                 updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .bind(&input.document_no)
            .bind(&input.customer_name)
            .bind(&input.product_model)
            .bind(&input.received_by)
            .bind(&input.notes)
            .bind(input.parts_estimate)
            .bind(input.services_estimate)
            .fetch_optional(pool)
            .await
    }

    /// Write a job's status. Returns `false` if the job does not exist.
    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: ServiceStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE jobs SET status_id = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(status.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a job that has no operations yet (intake mistakes).
    ///
    /// Returns `false` when nothing was deleted, either because the job
    /// does not exist or because work has already been logged against it;
    /// jobs with history leave the live store only through archival.
    pub async fn delete_if_empty(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM job_photos WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query(
            "DELETE FROM jobs WHERE id = $1 \
             AND NOT EXISTS (SELECT 1 FROM operations WHERE job_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
