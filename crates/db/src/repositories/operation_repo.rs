//! Repository for the `operations` table and its billable items.
//!
//! Inserting an operation raises the `OperationLogged` lifecycle event:
//! the owning job is forced to `QuotePending` regardless of its prior
//! status. That side effect is best-effort; the insert itself must
//! succeed even when the status write fails.

use sqlx::{PgPool, Postgres, Transaction};

use atolye_core::status::StatusEvent;
use atolye_core::types::DbId;

use crate::models::operation::{
    ChangedPart, CreateOperation, Operation, OperationDetail, ServiceItem,
};
use crate::repositories::JobRepo;

/// Column list for `operations` queries.
const OP_COLUMNS: &str = "id, job_id, performed_by, completed_at, created_at";

/// Column list for `changed_parts` queries.
const PART_COLUMNS: &str = "id, operation_id, name, quantity, price, list_price, discount_pct";

/// Column list for `service_items` queries.
const ITEM_COLUMNS: &str = "id, operation_id, name, price, list_price, discount_pct";

/// Provides CRUD operations for logged work.
pub struct OperationRepo;

impl OperationRepo {
    /// Log a new operation with its parts and service items.
    ///
    /// The operation and all its items are written in one transaction.
    /// Afterwards the owning job is forced to `QuotePending`; a failure
    /// there is logged and swallowed.
    pub async fn create(
        pool: &PgPool,
        job_id: DbId,
        input: &CreateOperation,
    ) -> Result<OperationDetail, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO operations (job_id, performed_by, completed_at) \
             VALUES ($1, $2, $3) \
             RETURNING {OP_COLUMNS}"
        );
        let operation = sqlx::query_as::<_, Operation>(&query)
            .bind(job_id)
            .bind(&input.performed_by)
            .bind(input.completed_at)
            .fetch_one(&mut *tx)
            .await?;

        let mut parts = Vec::with_capacity(input.parts.len());
        for part in &input.parts {
            let query = format!(
                "INSERT INTO changed_parts (operation_id, name, quantity, price, list_price, discount_pct) \
                 VALUES ($1, $2, $3, $4, $5, $6) \
                 RETURNING {PART_COLUMNS}"
            );
            parts.push(
                sqlx::query_as::<_, ChangedPart>(&query)
                    .bind(operation.id)
                    .bind(&part.name)
                    .bind(part.quantity)
                    .bind(part.price)
                    .bind(part.list_price)
                    .bind(part.discount_pct)
                    .fetch_one(&mut *tx)
                    .await?,
            );
        }

        let mut services = Vec::with_capacity(input.services.len());
        for item in &input.services {
            let query = format!(
                "INSERT INTO service_items (operation_id, name, price, list_price, discount_pct) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING {ITEM_COLUMNS}"
            );
            services.push(
                sqlx::query_as::<_, ServiceItem>(&query)
                    .bind(operation.id)
                    .bind(&item.name)
                    .bind(item.price)
                    .bind(item.list_price)
                    .bind(item.discount_pct)
                    .fetch_one(&mut *tx)
                    .await?,
            );
        }

        tx.commit().await?;

        // Logging billable work always means "this job now needs a quote".
        let forced = StatusEvent::OperationLogged.forced_status();
        if let Err(err) = JobRepo::set_status(pool, job_id, forced).await {
            tracing::warn!(
                job_id,
                operation_id = operation.id,
                error = %err,
                "Failed to force job status after logging operation",
            );
        }

        Ok(OperationDetail {
            operation,
            parts,
            services,
        })
    }

    /// Find one operation with its items.
    pub async fn find_detail(
        pool: &PgPool,
        operation_id: DbId,
    ) -> Result<Option<OperationDetail>, sqlx::Error> {
        let query = format!("SELECT {OP_COLUMNS} FROM operations WHERE id = $1");
        let Some(operation) = sqlx::query_as::<_, Operation>(&query)
            .bind(operation_id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let parts = Self::parts_of(pool, operation_id).await?;
        let services = Self::services_of(pool, operation_id).await?;

        Ok(Some(OperationDetail {
            operation,
            parts,
            services,
        }))
    }

    /// List a job's operations with their items, oldest first.
    pub async fn list_by_job(
        pool: &PgPool,
        job_id: DbId,
    ) -> Result<Vec<OperationDetail>, sqlx::Error> {
        let query = format!(
            "SELECT {OP_COLUMNS} FROM operations WHERE job_id = $1 ORDER BY created_at ASC, id ASC"
        );
        let operations = sqlx::query_as::<_, Operation>(&query)
            .bind(job_id)
            .fetch_all(pool)
            .await?;

        let mut details = Vec::with_capacity(operations.len());
        for operation in operations {
            let parts = Self::parts_of(pool, operation.id).await?;
            let services = Self::services_of(pool, operation.id).await?;
            details.push(OperationDetail {
                operation,
                parts,
                services,
            });
        }
        Ok(details)
    }

    /// Delete a single operation and its items. Returns `false` if the
    /// operation does not exist.
    pub async fn delete(pool: &PgPool, operation_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        Self::delete_items_in_tx(&mut tx, operation_id).await?;
        let result = sqlx::query("DELETE FROM operations WHERE id = $1")
            .bind(operation_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an operation's parts and items inside an open transaction.
    /// Shared with the archival engine's bulk deletion.
    pub async fn delete_items_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        operation_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM changed_parts WHERE operation_id = $1")
            .bind(operation_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query("DELETE FROM service_items WHERE operation_id = $1")
            .bind(operation_id)
            .execute(&mut **tx)
            .await?;
        Ok(())
    }

    async fn parts_of(pool: &PgPool, operation_id: DbId) -> Result<Vec<ChangedPart>, sqlx::Error> {
        let query =
            format!("SELECT {PART_COLUMNS} FROM changed_parts WHERE operation_id = $1 ORDER BY id");
        sqlx::query_as::<_, ChangedPart>(&query)
            .bind(operation_id)
            .fetch_all(pool)
            .await
    }

    async fn services_of(
        pool: &PgPool,
        operation_id: DbId,
    ) -> Result<Vec<ServiceItem>, sqlx::Error> {
        let query =
            format!("SELECT {ITEM_COLUMNS} FROM service_items WHERE operation_id = $1 ORDER BY id");
        sqlx::query_as::<_, ServiceItem>(&query)
            .bind(operation_id)
            .fetch_all(pool)
            .await
    }
}
