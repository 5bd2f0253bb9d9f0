//! Route definitions for quote dispatch.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dispatch;
use crate::state::AppState;

/// Routes mounted at `/dispatch`.
///
/// ```text
/// POST /quote       -> dispatch_quote
/// GET  /receipts    -> list_receipts
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(dispatch::dispatch_quote))
        .route("/receipts", get(dispatch::list_receipts))
}
