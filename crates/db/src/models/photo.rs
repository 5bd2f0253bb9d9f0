//! Photo reference models. File bytes live in photo storage on disk;
//! these rows only record the reference.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atolye_core::types::{DbId, Timestamp};

/// A row from the `job_photos` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct JobPhoto {
    pub id: DbId,
    pub job_id: DbId,
    pub file_name: String,
    pub rel_path: String,
    pub uploaded_at: Timestamp,
}

/// DTO for attaching a photo reference to a job.
#[derive(Debug, Deserialize)]
pub struct CreateJobPhoto {
    pub file_name: String,
    pub rel_path: String,
}
