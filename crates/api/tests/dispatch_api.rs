//! HTTP-level integration tests for quote dispatch.
//!
//! The test app runs without SMTP configuration, so every send fails;
//! these tests pin the degraded contract: the artifact and receipt are
//! still produced, no job advances, and the HTTP status stays 200.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, build_test_app, get, post_json};
use serde_json::json;
use sqlx::PgPool;

async fn create_job_with_operation(app: &Router, tracking_no: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/jobs",
        json!({"tracking_no": tracking_no, "customer_name": "Fatma Kaya"}),
    )
    .await;
    let job_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = post_json(
        app.clone(),
        &format!("/api/v1/jobs/{job_id}/operations"),
        json!({
            "performed_by": "Mehmet",
            "parts": [{"name": "Rezistans", "quantity": 2, "price": 150.0}],
            "services": [{"name": "İşçilik", "price": 200.0}],
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    job_id
}

// ---------------------------------------------------------------------------
// Test: dispatch without jobs or recipients is a 400
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn empty_dispatch_requests_are_rejected(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app.clone(),
        "/api/v1/dispatch/quote",
        json!({"job_ids": [], "to": ["musteri@example.com"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json(
        app,
        "/api/v1/dispatch/quote",
        json!({"job_ids": [1], "to": []}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Test: an unknown job id aborts the dispatch with 404
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_job_aborts_dispatch(pool: PgPool) {
    let app = build_test_app(pool);

    let response = post_json(
        app,
        "/api/v1/dispatch/quote",
        json!({"job_ids": [999999], "to": ["musteri@example.com"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: failed transport still yields artifact, receipt, and 200
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn failed_send_keeps_artifact_and_receipt(pool: PgPool) {
    let app = build_test_app(pool);
    let job_id = create_job_with_operation(&app, "TK-5001").await;

    let response = post_json(
        app.clone(),
        "/api/v1/dispatch/quote",
        json!({"job_ids": [job_id], "to": ["musteri@example.com"]}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["sent"], false);
    assert!(json["data"]["transport_error"].is_string());
    assert!(json["data"]["artifact_name"]
        .as_str()
        .unwrap()
        .starts_with("teklif-"));
    assert!(json["data"]["receipt_id"].is_i64());
    assert!(json["data"]["advanced_jobs"].as_array().unwrap().is_empty());

    // Receipt is listed.
    let json = body_json(get(app.clone(), "/api/v1/dispatch/receipts").await).await;
    let receipts = json["data"].as_array().unwrap();
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0]["recipient"], "musteri@example.com");

    // The job did not advance past quote-pending.
    let json = body_json(get(app, &format!("/api/v1/jobs/{job_id}")).await).await;
    assert_eq!(json["data"]["status_id"], 2);
}
