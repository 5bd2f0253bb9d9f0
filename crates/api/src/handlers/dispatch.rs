//! Handlers for quote dispatch and its receipts.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use atolye_db::repositories::ReceiptRepo;
use atolye_dispatch::DispatchRequest;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/dispatch/quote
///
/// Price the requested jobs, render one combined quote artifact, email
/// it, and record a receipt. The response reports the artifact and the
/// transport outcome independently; a failed send is not an HTTP error.
pub async fn dispatch_quote(
    State(state): State<AppState>,
    Json(request): Json<DispatchRequest>,
) -> AppResult<impl IntoResponse> {
    let outcome = state.dispatcher.dispatch(&state.pool, &request).await?;

    tracing::info!(
        artifact = %outcome.artifact_name,
        sent = outcome.sent,
        advanced = outcome.advanced_jobs.len(),
        "Quote dispatch finished",
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// Query parameters for receipt listing.
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// GET /api/v1/dispatch/receipts
///
/// List dispatch receipts, newest first.
pub async fn list_receipts(
    State(state): State<AppState>,
    Query(params): Query<ReceiptListQuery>,
) -> AppResult<impl IntoResponse> {
    let receipts = ReceiptRepo::list(&state.pool, params.limit, params.offset).await?;
    Ok(Json(DataResponse { data: receipts }))
}
