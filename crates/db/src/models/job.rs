//! Service job entity models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atolye_core::status::{ServiceStatus, StatusId};
use atolye_core::types::{DbId, Timestamp};

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub tracking_no: String,
    pub document_no: String,
    pub customer_name: String,
    pub product_model: String,
    pub received_by: String,
    pub notes: Option<String>,
    pub status_id: StatusId,
    /// Caller-supplied parts estimate, used to quote a job before any
    /// operation is logged.
    pub parts_estimate: Option<f64>,
    /// Caller-supplied services estimate, same purpose.
    pub services_estimate: Option<f64>,
    pub received_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// The decoded lifecycle status of this row.
    pub fn status(&self) -> ServiceStatus {
        ServiceStatus::from_id(self.status_id)
    }
}

/// DTO for recording a new job at intake.
#[derive(Debug, Deserialize)]
pub struct CreateJob {
    pub tracking_no: String,
    pub document_no: Option<String>,
    pub customer_name: String,
    pub product_model: Option<String>,
    pub received_by: Option<String>,
    pub notes: Option<String>,
    pub parts_estimate: Option<f64>,
    pub services_estimate: Option<f64>,
}

/// DTO for editing a job's descriptive fields. `None` leaves a field
/// unchanged; status is never written through this path.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateJob {
    pub document_no: Option<String>,
    pub customer_name: Option<String>,
    pub product_model: Option<String>,
    pub received_by: Option<String>,
    pub notes: Option<String>,
    pub parts_estimate: Option<f64>,
    pub services_estimate: Option<f64>,
}

/// Query parameters for job listing.
#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    /// Filter by status ID (e.g. 2 = quote pending).
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}
