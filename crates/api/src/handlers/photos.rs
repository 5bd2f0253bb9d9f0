//! Handlers for photo references and the photo-wait slot.
//!
//! Uploads are allowed for authenticated staff (upstream proxy sets
//! `x-authenticated-user`) or for the one job holding a live photo-wait
//! signal. The signal is consumed after a successful attach so it
//! cannot be replayed.

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use atolye_core::error::CoreError;
use atolye_core::types::DbId;
use atolye_db::models::photo::CreateJobPhoto;
use atolye_db::repositories::PhotoRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::jobs::find_job;
use crate::response::DataResponse;
use crate::state::AppState;

/// Header set by the upstream proxy for logged-in staff.
const AUTH_HEADER: &str = "x-authenticated-user";

/// POST /api/v1/jobs/{id}/photo-wait
///
/// Raise the awaiting-photos signal for a job, displacing any previous
/// signal. Returns the raised signal.
pub async fn raise_photo_wait(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_job(&state.pool, job_id).await?;

    let signal = state.photo_wait.raise(job_id);
    tracing::info!(job_id, "Photo-wait signal raised");

    Ok(Json(DataResponse { data: signal }))
}

/// GET /api/v1/photo-wait
///
/// The currently live signal, or `null` when none is live. Expired
/// signals are cleared by this read.
pub async fn current_photo_wait(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let signal = state.photo_wait.current();
    Ok(Json(DataResponse { data: signal }))
}

/// POST /api/v1/jobs/{id}/photos
///
/// Attach a photo reference to a job. Authorized for authenticated
/// callers, or unauthenticated ones while this job holds the live
/// photo-wait signal; a successful attach consumes the signal.
pub async fn attach_photo(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    headers: HeaderMap,
    Json(input): Json<CreateJobPhoto>,
) -> AppResult<impl IntoResponse> {
    let is_authenticated = headers.contains_key(AUTH_HEADER);

    if !state.photo_wait.authorize(job_id, is_authenticated) {
        return Err(AppError::Forbidden(
            "No live photo-wait signal for this job".to_string(),
        ));
    }

    find_job(&state.pool, job_id).await?;

    if input.file_name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "file_name must not be empty".to_string(),
        )));
    }

    let photo = PhotoRepo::add(&state.pool, job_id, &input).await?;

    if state.photo_wait.consume(job_id) {
        tracing::info!(job_id, photo_id = photo.id, "Photo-wait signal consumed");
    }

    Ok((StatusCode::CREATED, Json(DataResponse { data: photo })))
}

/// GET /api/v1/jobs/{id}/photos
pub async fn list_photos(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_job(&state.pool, job_id).await?;

    let photos = PhotoRepo::list_by_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: photos }))
}

/// DELETE /api/v1/photos/{id}
///
/// Remove a photo reference. The file itself stays in photo storage.
pub async fn delete_photo(
    State(state): State<AppState>,
    Path(photo_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = PhotoRepo::delete(&state.pool, photo_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Photo",
            id: photo_id,
        }));
    }

    Ok(StatusCode::NO_CONTENT)
}
