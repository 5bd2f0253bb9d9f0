//! The archival engine.
//!
//! A transition to `Completed` retires a job: its full state is captured
//! as a versioned JSON snapshot, one `archived_jobs` row is inserted, and
//! every live row (parts, items, operations, photos, the job itself) is
//! deleted — all inside one transaction. Any failure rolls the whole
//! thing back; a job is either fully live or fully archived.
//!
//! The one deliberate exception: when the archive table has not been
//! provisioned, the engine degrades gracefully by marking the job
//! `Completed` in place and reporting `archived: false` instead of losing
//! the completion. That path is warn-logged so the provisioning gap is
//! visible in operations.

use sqlx::PgPool;

use atolye_core::pricing::{self, QuoteTotals};
use atolye_core::snapshot::{JobSnapshot, OperationSnapshot, PhotoSnapshot, SNAPSHOT_SCHEMA_VERSION};
use atolye_core::status::ServiceStatus;
use atolye_core::types::DbId;

use crate::models::archived_job::{ArchiveListQuery, ArchivedJob};
use crate::models::job::Job;
use crate::repositories::{JobRepo, OperationRepo, PhotoRepo};

/// Column list for `archived_jobs` queries.
const COLUMNS: &str = "\
    id, job_id, tracking_no, document_no, customer_name, product_model, \
    received_at, archived_at, snapshot";

/// Maximum page size for archive listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for archive listing.
const DEFAULT_LIMIT: i64 = 50;

/// How an archival request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// Snapshot stored and all live rows deleted.
    Archived { archive_id: DbId },
    /// Archive table missing: job marked `Completed` in place, live rows
    /// kept. A distinct non-error outcome, not a failure.
    StoreUnavailable,
}

impl ArchiveOutcome {
    /// Whether the job actually left the live store.
    pub fn archived(&self) -> bool {
        matches!(self, Self::Archived { .. })
    }
}

/// Errors from the archival engine.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("Job {0} not found")]
    JobNotFound(DbId),

    /// The transaction was rolled back; no live data was touched.
    #[error("Archival transaction failed: {0}")]
    Database(#[from] sqlx::Error),
}

/// Builds snapshots, writes archive rows, and retires live jobs.
pub struct ArchiveRepo;

impl ArchiveRepo {
    /// Archive a job: snapshot, insert archive row, delete live rows.
    ///
    /// Exactly-once per job by construction: a second call fails with
    /// [`ArchiveError::JobNotFound`] because the live row is gone.
    pub async fn archive_job(pool: &PgPool, job_id: DbId) -> Result<ArchiveOutcome, ArchiveError> {
        let job = JobRepo::find_by_id(pool, job_id)
            .await?
            .ok_or(ArchiveError::JobNotFound(job_id))?;

        let operations = OperationRepo::list_by_job(pool, job_id).await?;
        let photos = PhotoRepo::list_by_job(pool, job_id).await?;

        let snapshot = build_snapshot(&job, &operations, &photos);

        if !Self::store_available(pool).await? {
            tracing::warn!(
                job_id,
                "Archive table missing; marking job Completed in place without archiving",
            );
            JobRepo::set_status(pool, job_id, ServiceStatus::Completed).await?;
            return Ok(ArchiveOutcome::StoreUnavailable);
        }

        let snapshot_json =
            serde_json::to_value(&snapshot).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO archived_jobs \
                 (job_id, tracking_no, document_no, customer_name, product_model, \
                  received_at, snapshot) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id"
        );
        let (archive_id,): (DbId,) = sqlx::query_as(&query)
            .bind(job.id)
            .bind(&job.tracking_no)
            .bind(&job.document_no)
            .bind(&job.customer_name)
            .bind(&job.product_model)
            .bind(job.received_at)
            .bind(&snapshot_json)
            .fetch_one(&mut *tx)
            .await?;

        for detail in &operations {
            OperationRepo::delete_items_in_tx(&mut tx, detail.operation.id).await?;
        }
        sqlx::query("DELETE FROM operations WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM job_photos WHERE job_id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(job_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(job_id, archive_id, "Job archived");
        Ok(ArchiveOutcome::Archived { archive_id })
    }

    /// Probe whether the archive table has been provisioned.
    pub async fn store_available(pool: &PgPool) -> Result<bool, sqlx::Error> {
        let (present,): (bool,) =
            sqlx::query_as("SELECT to_regclass('public.archived_jobs') IS NOT NULL")
                .fetch_one(pool)
                .await?;
        Ok(present)
    }

    /// Find an archived job by its archive ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ArchivedJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM archived_jobs WHERE id = $1");
        sqlx::query_as::<_, ArchivedJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List archived jobs, newest first, with an optional search over
    /// tracking number and customer name.
    pub async fn list(
        pool: &PgPool,
        params: &ArchiveListQuery,
    ) -> Result<Vec<ArchivedJob>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0);

        if let Some(search) = params.search.as_deref().filter(|s| !s.is_empty()) {
            let pattern = format!("%{search}%");
            let query = format!(
                "SELECT {COLUMNS} FROM archived_jobs \
                 WHERE tracking_no ILIKE $1 OR customer_name ILIKE $1 \
                 ORDER BY archived_at DESC, id DESC LIMIT $2 OFFSET $3"
            );
            sqlx::query_as::<_, ArchivedJob>(&query)
                .bind(pattern)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        } else {
            let query = format!(
                "SELECT {COLUMNS} FROM archived_jobs \
                 ORDER BY archived_at DESC, id DESC LIMIT $1 OFFSET $2"
            );
            sqlx::query_as::<_, ArchivedJob>(&query)
                .bind(limit)
                .bind(offset)
                .fetch_all(pool)
                .await
        }
    }
}

/// Capture a job's full state as the versioned snapshot document.
fn build_snapshot(
    job: &Job,
    operations: &[crate::models::operation::OperationDetail],
    photos: &[crate::models::photo::JobPhoto],
) -> JobSnapshot {
    let totals = job_totals(job, operations);

    JobSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        job_id: job.id,
        tracking_no: job.tracking_no.clone(),
        document_no: job.document_no.clone(),
        customer_name: job.customer_name.clone(),
        product_model: job.product_model.clone(),
        received_by: job.received_by.clone(),
        notes: job.notes.clone(),
        received_at: job.received_at,
        operations: operations
            .iter()
            .map(|detail| {
                let sheet = detail.worksheet();
                OperationSnapshot {
                    operation_id: detail.operation.id,
                    performed_by: detail.operation.performed_by.clone(),
                    completed_at: detail.operation.completed_at,
                    parts: sheet.parts,
                    services: sheet.services,
                }
            })
            .collect(),
        photos: photos
            .iter()
            .map(|photo| PhotoSnapshot {
                file_name: photo.file_name.clone(),
                rel_path: photo.rel_path.clone(),
                uploaded_at: photo.uploaded_at,
            })
            .collect(),
        totals,
    }
}

/// Priced totals for a job: the pricing engine over its worksheets, or
/// the intake estimates when no work has been logged.
pub fn job_totals(
    job: &Job,
    operations: &[crate::models::operation::OperationDetail],
) -> QuoteTotals {
    if operations.is_empty() {
        pricing::price_estimates(
            job.parts_estimate.unwrap_or(0.0),
            job.services_estimate.unwrap_or(0.0),
        )
    } else {
        let sheets: Vec<_> = operations.iter().map(|d| d.worksheet()).collect();
        pricing::price_worksheets(&sheets).totals
    }
}
