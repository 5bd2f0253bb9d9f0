//! Row models and DTOs for the service-job tables.

pub mod archived_job;
pub mod dispatch_receipt;
pub mod job;
pub mod operation;
pub mod photo;
