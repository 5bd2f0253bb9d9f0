//! Handlers for the `/jobs` resource: intake CRUD plus lifecycle
//! transitions.
//!
//! Status is never written through the plain update path; it only moves
//! through [`transition_job`], which owns the fallback-to-`Opened` rule
//! and the hand-off to the archival engine.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use atolye_core::error::CoreError;
use atolye_core::status::ServiceStatus;
use atolye_core::types::DbId;
use atolye_db::lifecycle::{self, TransitionOutcome};
use atolye_db::models::job::{CreateJob, Job, JobListQuery, UpdateJob};
use atolye_db::repositories::{ArchiveOutcome, JobRepo};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch a job by ID or return a 404 error.
pub(crate) async fn find_job(pool: &sqlx::PgPool, job_id: DbId) -> AppResult<Job> {
    JobRepo::find_by_id(pool, job_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))
}

// ---------------------------------------------------------------------------
// Intake CRUD
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Record a new job at intake. Returns 201 with the created job, which
/// always starts in `Açıldı`.
pub async fn create_job(
    State(state): State<AppState>,
    Json(input): Json<CreateJob>,
) -> AppResult<impl IntoResponse> {
    if input.tracking_no.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "tracking_no must not be empty".to_string(),
        )));
    }
    if input.customer_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "customer_name must not be empty".to_string(),
        )));
    }

    let job = JobRepo::create(&state.pool, &input).await?;

    tracing::info!(
        job_id = job.id,
        tracking_no = %job.tracking_no,
        "Job recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: job })))
}

/// GET /api/v1/jobs
///
/// List live jobs, newest first. Supports optional `status_id`, `limit`,
/// and `offset` query parameters.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<impl IntoResponse> {
    let jobs = JobRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: jobs }))
}

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = find_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: job }))
}

/// PUT /api/v1/jobs/{id}
///
/// Update a job's descriptive fields. Omitted fields keep their value;
/// status cannot be changed here.
pub async fn update_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<UpdateJob>,
) -> AppResult<impl IntoResponse> {
    let job = JobRepo::update(&state.pool, job_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Job",
            id: job_id,
        }))?;
    Ok(Json(DataResponse { data: job }))
}

/// DELETE /api/v1/jobs/{id}
///
/// Remove an intake mistake. Returns 204 on success, 409 if work has
/// already been logged against the job (such jobs only leave through
/// archival).
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    // Distinguish "never existed" from "has history".
    find_job(&state.pool, job_id).await?;

    let deleted = JobRepo::delete_if_empty(&state.pool, job_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::Conflict(
            "Job has logged operations and can only be retired through archival".to_string(),
        )));
    }

    tracing::info!(job_id, "Job deleted at intake");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Request body for a status transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// The requested status label, e.g. `"Onaylandı"`. Unrecognized
    /// labels fall back to `Açıldı` rather than erroring.
    pub status: String,
}

/// What a transition request actually did.
#[derive(Debug, Serialize)]
pub struct TransitionResponse {
    /// The status label now in effect for the job.
    pub status: &'static str,
    /// Whether the job was moved to cold storage.
    pub archived: bool,
    /// Archive row id, when `archived` is true.
    pub archive_id: Option<DbId>,
}

/// PUT /api/v1/jobs/{id}/status
///
/// Apply a lifecycle transition. A request for the terminal status runs
/// the archival engine instead of writing the field; when the archive
/// table is unavailable the job is marked completed in place and
/// `archived` is reported as false.
pub async fn transition_job(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = lifecycle::apply_transition(&state.pool, job_id, &input.status).await?;

    let response = match outcome {
        TransitionOutcome::Updated(status) => TransitionResponse {
            status: status.label(),
            archived: false,
            archive_id: None,
        },
        TransitionOutcome::Completed(archive) => {
            let archive_id = match archive {
                ArchiveOutcome::Archived { archive_id } => Some(archive_id),
                ArchiveOutcome::StoreUnavailable => None,
            };
            TransitionResponse {
                status: ServiceStatus::Completed.label(),
                archived: archive.archived(),
                archive_id,
            }
        }
    };

    tracing::info!(
        job_id,
        status = response.status,
        archived = response.archived,
        "Transition applied",
    );

    Ok(Json(DataResponse { data: response }))
}
