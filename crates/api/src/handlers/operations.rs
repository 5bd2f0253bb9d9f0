//! Handlers for repair operations and their billed items.
//!
//! Logging an operation forces the owning job back to `Teklif Bekliyor`;
//! that rule lives in the repository so every write path shares it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use atolye_core::error::CoreError;
use atolye_core::types::DbId;
use atolye_db::models::operation::CreateOperation;
use atolye_db::repositories::OperationRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::jobs::find_job;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/jobs/{id}/operations
///
/// Log an operation with its changed parts and service items. Returns
/// 201 with the full detail; the owning job is moved to quote-pending.
pub async fn log_operation(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
    Json(input): Json<CreateOperation>,
) -> AppResult<impl IntoResponse> {
    find_job(&state.pool, job_id).await?;

    for part in &input.parts {
        if part.quantity < 1 {
            return Err(AppError::Core(CoreError::Validation(
                "Part quantity must be at least 1".to_string(),
            )));
        }
    }

    let detail = OperationRepo::create(&state.pool, job_id, &input).await?;

    tracing::info!(
        job_id,
        operation_id = detail.operation.id,
        parts = detail.parts.len(),
        services = detail.services.len(),
        "Operation logged",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/jobs/{id}/operations
///
/// List a job's operations, oldest first, each with its items.
pub async fn list_operations(
    State(state): State<AppState>,
    Path(job_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    find_job(&state.pool, job_id).await?;

    let operations = OperationRepo::list_by_job(&state.pool, job_id).await?;
    Ok(Json(DataResponse { data: operations }))
}

/// GET /api/v1/operations/{id}
pub async fn get_operation(
    State(state): State<AppState>,
    Path(operation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = OperationRepo::find_detail(&state.pool, operation_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Operation",
            id: operation_id,
        }))?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/operations/{id}
///
/// Remove an operation and its items. Returns 204, or 404 if it does
/// not exist.
pub async fn delete_operation(
    State(state): State<AppState>,
    Path(operation_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = OperationRepo::delete(&state.pool, operation_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Operation",
            id: operation_id,
        }));
    }

    tracing::info!(operation_id, "Operation deleted");
    Ok(StatusCode::NO_CONTENT)
}
