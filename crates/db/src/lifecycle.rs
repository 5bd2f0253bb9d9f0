//! Lifecycle transition entry point.
//!
//! All status changes requested from outside (handlers, bulk updates
//! after dispatch) go through [`apply_transition`], which owns the two
//! special cases: invalid labels silently fall back to `Opened`, and a
//! request for `Completed` is not a field write at all but a delegation
//! to the archival engine.

use sqlx::PgPool;

use atolye_core::status::ServiceStatus;
use atolye_core::types::DbId;

use crate::repositories::{ArchiveError, ArchiveOutcome, ArchiveRepo, JobRepo};

/// Result of a transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// Plain status write; carries the status actually persisted (which
    /// is `Opened` when the requested label failed validation).
    Updated(ServiceStatus),
    /// The job reached its terminal status; see the archival outcome.
    Completed(ArchiveOutcome),
}

/// Apply a requested status transition to a job.
///
/// `requested` is the raw label from the caller. Exactly one transition
/// is applied per call.
pub async fn apply_transition(
    pool: &PgPool,
    job_id: DbId,
    requested: &str,
) -> Result<TransitionOutcome, ArchiveError> {
    let status = ServiceStatus::parse_or_default(requested);

    if status.is_terminal() {
        let outcome = ArchiveRepo::archive_job(pool, job_id).await?;
        return Ok(TransitionOutcome::Completed(outcome));
    }

    if !JobRepo::set_status(pool, job_id, status).await? {
        return Err(ArchiveError::JobNotFound(job_id));
    }

    tracing::debug!(job_id, status = status.label(), "Job status updated");
    Ok(TransitionOutcome::Updated(status))
}
