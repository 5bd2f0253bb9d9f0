//! Archived job models: cold-storage rows created exactly once per job
//! by the archival engine, never mutated afterwards.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atolye_core::types::{DbId, Timestamp};

/// A row from the `archived_jobs` table.
///
/// `id` is its own sequence, distinct from the retired job's id;
/// `job_id` is only a back-reference. `snapshot` holds the versioned
/// JSON document (see `atolye_core::snapshot`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ArchivedJob {
    pub id: DbId,
    pub job_id: DbId,
    pub tracking_no: String,
    pub document_no: String,
    pub customer_name: String,
    pub product_model: String,
    pub received_at: Timestamp,
    pub archived_at: Timestamp,
    pub snapshot: serde_json::Value,
}

/// Query parameters for archive listing.
#[derive(Debug, Default, Deserialize)]
pub struct ArchiveListQuery {
    /// Case-insensitive substring match on tracking number or customer.
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
