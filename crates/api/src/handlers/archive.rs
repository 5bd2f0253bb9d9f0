//! Handlers for the read-only archive surface.
//!
//! Archive rows are immutable once written; there is no update or
//! delete here by design.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;

use atolye_core::error::CoreError;
use atolye_core::types::DbId;
use atolye_db::models::archived_job::ArchiveListQuery;
use atolye_db::repositories::ArchiveRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/archive
///
/// List archived jobs, newest first. `?search=` matches tracking number
/// or customer name, case-insensitively.
pub async fn list_archive(
    State(state): State<AppState>,
    Query(params): Query<ArchiveListQuery>,
) -> AppResult<impl IntoResponse> {
    let archived = ArchiveRepo::list(&state.pool, &params).await?;
    Ok(Json(DataResponse { data: archived }))
}

/// GET /api/v1/archive/{id}
///
/// One archived job with its full snapshot document.
pub async fn get_archived_job(
    State(state): State<AppState>,
    Path(archive_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let archived = ArchiveRepo::find_by_id(&state.pool, archive_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Archived job",
            id: archive_id,
        }))?;
    Ok(Json(DataResponse { data: archived }))
}
