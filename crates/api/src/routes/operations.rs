//! Route definitions for the `/operations` resource.
//!
//! Creation and listing live under `/jobs/{id}/operations`; this router
//! only addresses operations by their own id.

use axum::routing::get;
use axum::Router;

use crate::handlers::operations;
use crate::state::AppState;

/// Routes mounted at `/operations`.
///
/// ```text
/// GET    /{id}    -> get_operation
/// DELETE /{id}    -> delete_operation
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        get(operations::get_operation).delete(operations::delete_operation),
    )
}
