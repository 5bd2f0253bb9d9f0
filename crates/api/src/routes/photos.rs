//! Route definitions for photo references and the photo-wait slot.
//!
//! Attachment and listing live under `/jobs/{id}/photos`; these routes
//! cover the job-independent pieces.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::photos;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// DELETE /photos/{id}    -> delete_photo
/// GET    /photo-wait     -> current_photo_wait
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/photos/{id}", delete(photos::delete_photo))
        .route("/photo-wait", get(photos::current_photo_wait))
}
