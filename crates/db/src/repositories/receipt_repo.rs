//! Repository for the append-only `dispatch_receipts` table.

use sqlx::PgPool;

use crate::models::dispatch_receipt::{CreateDispatchReceipt, DispatchReceipt};

/// Column list for `dispatch_receipts` queries.
const COLUMNS: &str =
    "id, recipient, document_no, artifact_name, job_ids, customer_name, sender_name, sent_at";

/// Default page size for receipt listing.
const DEFAULT_LIMIT: i64 = 50;

/// Records quote dispatch attempts. Rows are never updated or deleted.
pub struct ReceiptRepo;

impl ReceiptRepo {
    /// Record a dispatch attempt.
    pub async fn record(
        pool: &PgPool,
        input: &CreateDispatchReceipt,
    ) -> Result<DispatchReceipt, sqlx::Error> {
        let query = format!(
            "INSERT INTO dispatch_receipts \
                 (recipient, document_no, artifact_name, job_ids, customer_name, sender_name) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DispatchReceipt>(&query)
            .bind(&input.recipient)
            .bind(&input.document_no)
            .bind(&input.artifact_name)
            .bind(&input.job_ids)
            .bind(&input.customer_name)
            .bind(&input.sender_name)
            .fetch_one(pool)
            .await
    }

    /// List receipts, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<DispatchReceipt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM dispatch_receipts \
             ORDER BY sent_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, DispatchReceipt>(&query)
            .bind(limit.unwrap_or(DEFAULT_LIMIT))
            .bind(offset.unwrap_or(0))
            .fetch_all(pool)
            .await
    }
}
