//! Route definitions for the `/jobs` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{jobs, operations, photos};
use crate::state::AppState;

/// Routes mounted at `/jobs`.
///
/// ```text
/// GET    /                   -> list_jobs
/// POST   /                   -> create_job
/// GET    /{id}               -> get_job
/// PUT    /{id}               -> update_job
/// DELETE /{id}               -> delete_job
/// PUT    /{id}/status        -> transition_job
/// GET    /{id}/operations    -> list_operations
/// POST   /{id}/operations    -> log_operation
/// GET    /{id}/photos        -> list_photos
/// POST   /{id}/photos        -> attach_photo
/// POST   /{id}/photo-wait    -> raise_photo_wait
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(jobs::list_jobs).post(jobs::create_job))
        .route(
            "/{id}",
            get(jobs::get_job)
                .put(jobs::update_job)
                .delete(jobs::delete_job),
        )
        .route("/{id}/status", put(jobs::transition_job))
        .route(
            "/{id}/operations",
            get(operations::list_operations).post(operations::log_operation),
        )
        .route(
            "/{id}/photos",
            get(photos::list_photos).post(photos::attach_photo),
        )
        .route("/{id}/photo-wait", post(photos::raise_photo_wait))
}
