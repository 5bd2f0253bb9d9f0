pub mod archive;
pub mod dispatch;
pub mod health;
pub mod jobs;
pub mod operations;
pub mod photos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /jobs                          list, create
/// /jobs/{id}                     get, update, delete
/// /jobs/{id}/status              apply a lifecycle transition (PUT)
/// /jobs/{id}/operations          list, log operation
/// /jobs/{id}/photos              list, attach photo reference
/// /jobs/{id}/photo-wait          raise the awaiting-photos signal (POST)
///
/// /operations/{id}               get detail, delete
///
/// /photos/{id}                   delete photo reference
/// /photo-wait                    current signal, if any (GET)
///
/// /dispatch/quote                render + email a quote batch (POST)
/// /dispatch/receipts             list dispatch receipts (GET)
///
/// /archive                       list archived jobs (?search=)
/// /archive/{id}                  get archived job with snapshot
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Service jobs: intake CRUD, lifecycle transitions, and their
        // nested operations / photos / photo-wait endpoints.
        .nest("/jobs", jobs::router())
        // Operation detail and deletion by operation id.
        .nest("/operations", operations::router())
        // Photo deletion and the global photo-wait slot.
        .merge(photos::router())
        // Quote rendering, email dispatch, and receipts.
        .nest("/dispatch", dispatch::router())
        // Cold storage: archived jobs and their snapshots.
        .nest("/archive", archive::router())
}
