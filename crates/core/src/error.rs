use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Archival failed for job {job_id}: {detail}")]
    Archival { job_id: DbId, detail: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
