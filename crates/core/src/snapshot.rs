//! Immutable archive snapshot of a completed job.
//!
//! When a job reaches its terminal status its full state (descriptive
//! fields, every operation with its billable items, photo metadata, and
//! the priced totals at archival time) is captured as one JSON document
//! and the live rows are deleted. The snapshot carries a `schema_version`
//! tag so future readers can detect format drift without having to
//! version the live schema for retired data.

use serde::{Deserialize, Serialize};

use crate::pricing::{PartItem, QuoteTotals, ServiceEntry};
use crate::types::{DbId, Timestamp};

/// Current snapshot document format.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// The archived state of one operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSnapshot {
    /// Live operation id at archival time (back-reference only).
    pub operation_id: DbId,
    pub performed_by: String,
    pub completed_at: Option<Timestamp>,
    pub parts: Vec<PartItem>,
    pub services: Vec<ServiceEntry>,
}

/// The archived metadata of one photo. File contents stay in photo
/// storage; only the reference is captured.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhotoSnapshot {
    pub file_name: String,
    pub rel_path: String,
    pub uploaded_at: Timestamp,
}

/// The full serialized snapshot of a job at archival time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSnapshot {
    /// Format tag; always [`SNAPSHOT_SCHEMA_VERSION`] for new snapshots.
    pub schema_version: u32,
    /// Live job id at archival time (back-reference, not a key).
    pub job_id: DbId,
    pub tracking_no: String,
    pub document_no: String,
    pub customer_name: String,
    pub product_model: String,
    pub received_by: String,
    pub notes: Option<String>,
    pub received_at: Timestamp,
    pub operations: Vec<OperationSnapshot>,
    pub photos: Vec<PhotoSnapshot>,
    /// Priced totals computed from the operations at archival time.
    pub totals: QuoteTotals,
}
