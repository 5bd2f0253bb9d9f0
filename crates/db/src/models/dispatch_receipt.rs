//! Dispatch receipt models: the append-only record of every quote
//! dispatch attempt.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atolye_core::types::{DbId, Timestamp};

/// A row from the `dispatch_receipts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DispatchReceipt {
    pub id: DbId,
    pub recipient: String,
    pub document_no: String,
    pub artifact_name: String,
    pub job_ids: Vec<DbId>,
    pub customer_name: String,
    pub sender_name: Option<String>,
    pub sent_at: Timestamp,
}

/// DTO for recording a dispatch.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDispatchReceipt {
    pub recipient: String,
    pub document_no: String,
    pub artifact_name: String,
    pub job_ids: Vec<DbId>,
    pub customer_name: String,
    pub sender_name: Option<String>,
}
