//! Pure domain logic for the service-job tracking system.
//!
//! This crate has no internal dependencies and no I/O: the status state
//! machine, the quote pricing engine, the versioned archive snapshot
//! model, and the photo-wait signal coordinator all live here so they can
//! be exercised without a database.

pub mod error;
pub mod photo_wait;
pub mod pricing;
pub mod snapshot;
pub mod status;
pub mod types;
