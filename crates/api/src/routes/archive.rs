//! Route definitions for the read-only `/archive` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::archive;
use crate::state::AppState;

/// Routes mounted at `/archive`.
///
/// ```text
/// GET /         -> list_archive
/// GET /{id}     -> get_archived_job
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(archive::list_archive))
        .route("/{id}", get(archive::get_archived_job))
}
