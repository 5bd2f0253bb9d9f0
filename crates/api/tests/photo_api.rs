//! HTTP-level integration tests for photo references and the
//! photo-wait authorization flow.

mod common;

use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use common::{body_json, build_test_app, delete, get, post_json};
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Create a job directly through the API and return its id.
async fn create_job(app: &Router, tracking_no: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/jobs",
        json!({"tracking_no": tracking_no, "customer_name": "Ali Demir"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

fn photo_body() -> serde_json::Value {
    json!({"file_name": "on.jpg", "rel_path": "2024/on.jpg"})
}

/// POST with the header the upstream proxy sets for logged-in staff.
async fn post_json_authed(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .header("x-authenticated-user", "mehmet")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

// ---------------------------------------------------------------------------
// Test: raising a signal makes it visible on GET /photo-wait
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn raised_signal_is_visible(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job(&app, "TK-4001").await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/photo-wait"),
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(get(app, "/api/v1/photo-wait").await).await;
    assert_eq!(json["data"]["job_id"], job_id);
}

// ---------------------------------------------------------------------------
// Test: unauthenticated upload without a signal is forbidden
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unauthenticated_upload_without_signal_is_forbidden(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job(&app, "TK-4002").await;

    let response = post_json(app, &format!("/api/v1/jobs/{job_id}/photos"), photo_body()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: a live signal authorizes exactly one unauthenticated upload
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signal_authorizes_one_upload_then_is_consumed(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job(&app, "TK-4003").await;

    post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/photo-wait"),
        json!({}),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/photos"),
        photo_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // The signal was consumed by the successful upload.
    let json = body_json(get(app.clone(), "/api/v1/photo-wait").await).await;
    assert!(json["data"].is_null());

    let response = post_json(app, &format!("/api/v1/jobs/{job_id}/photos"), photo_body()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: the signal is job-scoped; another job's upload stays forbidden
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signal_does_not_authorize_other_jobs(pool: PgPool) {
    let app = build_test_app(pool);
    let signaled = create_job(&app, "TK-4004").await;
    let other = create_job(&app, "TK-4005").await;

    post_json(
        app.clone(),
        &format!("/api/v1/jobs/{signaled}/photo-wait"),
        json!({}),
    )
    .await;

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{other}/photos"),
        photo_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The signaled job's grant is still intact.
    let json = body_json(get(app, "/api/v1/photo-wait").await).await;
    assert_eq!(json["data"]["job_id"], signaled);
}

// ---------------------------------------------------------------------------
// Test: authenticated staff upload without any signal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn authenticated_upload_needs_no_signal(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job(&app, "TK-4006").await;

    let response =
        post_json_authed(app.clone(), &format!("/api/v1/jobs/{job_id}/photos"), photo_body())
            .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(get(app, &format!("/api/v1/jobs/{job_id}/photos")).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Test: raising for a second job displaces the first signal
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn raising_again_displaces_previous_signal(pool: PgPool) {
    let app = build_test_app(pool);
    let first = create_job(&app, "TK-4007").await;
    let second = create_job(&app, "TK-4008").await;

    post_json(
        app.clone(),
        &format!("/api/v1/jobs/{first}/photo-wait"),
        json!({}),
    )
    .await;
    post_json(
        app.clone(),
        &format!("/api/v1/jobs/{second}/photo-wait"),
        json!({}),
    )
    .await;

    let json = body_json(get(app.clone(), "/api/v1/photo-wait").await).await;
    assert_eq!(json["data"]["job_id"], second);

    let response = post_json(
        app,
        &format!("/api/v1/jobs/{first}/photos"),
        photo_body(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Test: deleting a photo reference
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_photo_reference(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job(&app, "TK-4009").await;

    let response =
        post_json_authed(app.clone(), &format!("/api/v1/jobs/{job_id}/photos"), photo_body())
            .await;
    let photo_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = delete(app.clone(), &format!("/api/v1/photos/{photo_id}")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = delete(app, &format!("/api/v1/photos/{photo_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
