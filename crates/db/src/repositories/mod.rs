//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod archive_repo;
pub mod job_repo;
pub mod operation_repo;
pub mod photo_repo;
pub mod receipt_repo;

pub use archive_repo::{ArchiveError, ArchiveOutcome, ArchiveRepo};
pub use job_repo::JobRepo;
pub use operation_repo::OperationRepo;
pub use photo_repo::PhotoRepo;
pub use receipt_repo::ReceiptRepo;
