//! Operation entity models: one unit of billable work logged against a
//! job, owning its changed parts and service items.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use atolye_core::pricing::{PartItem, ServiceEntry, WorkSheet};
use atolye_core::types::{DbId, Timestamp};

/// A row from the `operations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Operation {
    pub id: DbId,
    pub job_id: DbId,
    pub performed_by: String,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// A row from the `changed_parts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChangedPart {
    pub id: DbId,
    pub operation_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// A row from the `service_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceItem {
    pub id: DbId,
    pub operation_id: DbId,
    pub name: String,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// DTO for one changed part within a new operation.
#[derive(Debug, Deserialize)]
pub struct CreateChangedPart {
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// DTO for one service item within a new operation.
#[derive(Debug, Deserialize)]
pub struct CreateServiceItem {
    pub name: String,
    pub price: f64,
    pub list_price: Option<f64>,
    pub discount_pct: Option<f64>,
}

/// DTO for logging a new operation with its billable items.
#[derive(Debug, Deserialize)]
pub struct CreateOperation {
    pub performed_by: String,
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub parts: Vec<CreateChangedPart>,
    #[serde(default)]
    pub services: Vec<CreateServiceItem>,
}

/// An operation together with its billable items.
#[derive(Debug, Clone, Serialize)]
pub struct OperationDetail {
    #[serde(flatten)]
    pub operation: Operation,
    pub parts: Vec<ChangedPart>,
    pub services: Vec<ServiceItem>,
}

impl OperationDetail {
    /// Convert the billable items into pricing-engine input.
    pub fn worksheet(&self) -> WorkSheet {
        WorkSheet {
            parts: self
                .parts
                .iter()
                .map(|p| PartItem {
                    name: p.name.clone(),
                    quantity: p.quantity,
                    price: p.price,
                    list_price: p.list_price,
                    discount_pct: p.discount_pct,
                })
                .collect(),
            services: self
                .services
                .iter()
                .map(|s| ServiceEntry {
                    name: s.name.clone(),
                    price: s.price,
                    list_price: s.list_price,
                    discount_pct: s.discount_pct,
                })
                .collect(),
        }
    }
}
