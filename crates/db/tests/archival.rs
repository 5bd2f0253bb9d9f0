//! Integration tests for the archival engine and lifecycle transitions.
//!
//! The rollback test injects a failure mid-transaction with a database
//! trigger that rejects operation deletes, then asserts that neither
//! live rows nor archive rows changed.

use assert_matches::assert_matches;
use atolye_core::snapshot::SNAPSHOT_SCHEMA_VERSION;
use atolye_core::status::ServiceStatus;
use atolye_db::lifecycle::{self, TransitionOutcome};
use atolye_db::models::archived_job::ArchiveListQuery;
use atolye_db::models::job::CreateJob;
use atolye_db::models::operation::{CreateChangedPart, CreateOperation, CreateServiceItem};
use atolye_db::models::photo::CreateJobPhoto;
use atolye_db::repositories::{
    ArchiveError, ArchiveOutcome, ArchiveRepo, JobRepo, OperationRepo, PhotoRepo,
};
use sqlx::PgPool;

fn new_job(tracking_no: &str) -> CreateJob {
    CreateJob {
        tracking_no: tracking_no.to_string(),
        document_no: Some("DOC-9".to_string()),
        customer_name: "Ayşe Yılmaz".to_string(),
        product_model: Some("Telefon Z".to_string()),
        received_by: Some("Mehmet".to_string()),
        notes: Some("Su hasarı".to_string()),
        parts_estimate: Some(150.0),
        services_estimate: Some(50.0),
    }
}

fn new_operation(price: f64) -> CreateOperation {
    CreateOperation {
        performed_by: "Mehmet".to_string(),
        completed_at: None,
        parts: vec![CreateChangedPart {
            name: "Anakart".to_string(),
            quantity: 1,
            price,
            list_price: None,
            discount_pct: None,
        }],
        services: vec![CreateServiceItem {
            name: "Temizlik".to_string(),
            price: 25.0,
            list_price: None,
            discount_pct: None,
        }],
    }
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let (n,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap();
    n
}

/// Job + two operations + one photo, ready to archive.
async fn seed_full_job(pool: &PgPool) -> atolye_core::types::DbId {
    let job = JobRepo::create(pool, &new_job("TS-1")).await.unwrap();
    OperationRepo::create(pool, job.id, &new_operation(100.0))
        .await
        .unwrap();
    OperationRepo::create(pool, job.id, &new_operation(200.0))
        .await
        .unwrap();
    PhotoRepo::add(
        pool,
        job.id,
        &CreateJobPhoto {
            file_name: "hasar.jpg".to_string(),
            rel_path: "2024/01/hasar.jpg".to_string(),
        },
    )
    .await
    .unwrap();
    job.id
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_retires_all_live_rows(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    let outcome = ArchiveRepo::archive_job(&pool, job_id).await.unwrap();
    let archive_id = match outcome {
        ArchiveOutcome::Archived { archive_id } => archive_id,
        other => panic!("expected Archived, got {other:?}"),
    };

    assert_eq!(count(&pool, "jobs").await, 0);
    assert_eq!(count(&pool, "operations").await, 0);
    assert_eq!(count(&pool, "changed_parts").await, 0);
    assert_eq!(count(&pool, "service_items").await, 0);
    assert_eq!(count(&pool, "job_photos").await, 0);
    assert_eq!(count(&pool, "archived_jobs").await, 1);

    let archived = ArchiveRepo::find_by_id(&pool, archive_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(archived.job_id, job_id);
    assert_eq!(archived.tracking_no, "TS-1");

    let snapshot = &archived.snapshot;
    assert_eq!(snapshot["schema_version"], SNAPSHOT_SCHEMA_VERSION);
    assert_eq!(snapshot["operations"].as_array().unwrap().len(), 2);
    assert_eq!(snapshot["photos"].as_array().unwrap().len(), 1);
    // 100 + 25 + 200 + 25 = 350 subtotal, 70 tax.
    assert_eq!(snapshot["totals"]["subtotal"], 350.0);
    assert_eq!(snapshot["totals"]["tax"], 70.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archiving_twice_reports_not_found(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    ArchiveRepo::archive_job(&pool, job_id).await.unwrap();
    let second = ArchiveRepo::archive_job(&pool, job_id).await;

    assert_matches!(second, Err(ArchiveError::JobNotFound(id)) if id == job_id);
    assert_eq!(count(&pool, "archived_jobs").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn mid_transaction_failure_rolls_back_everything(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    // Inject a failure into the archival transaction: the operation
    // deletes will hit this trigger after the archive row was inserted.
    sqlx::query(
        "CREATE FUNCTION reject_operation_delete() RETURNS trigger AS $$ \
         BEGIN RAISE EXCEPTION 'delete rejected by test trigger'; END; \
         $$ LANGUAGE plpgsql",
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER trg_reject_operation_delete \
         BEFORE DELETE ON operations \
         FOR EACH ROW EXECUTE FUNCTION reject_operation_delete()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result = ArchiveRepo::archive_job(&pool, job_id).await;
    assert_matches!(result, Err(ArchiveError::Database(_)));

    // Full rollback: archive row gone, every live row untouched.
    assert_eq!(count(&pool, "archived_jobs").await, 0);
    assert_eq!(count(&pool, "jobs").await, 1);
    assert_eq!(count(&pool, "operations").await, 2);
    assert_eq!(count(&pool, "changed_parts").await, 2);
    assert_eq!(count(&pool, "service_items").await, 2);
    assert_eq!(count(&pool, "job_photos").await, 1);

    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();
    assert_eq!(job.status(), ServiceStatus::QuotePending);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn missing_archive_table_degrades_to_in_place_completion(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    sqlx::query("DROP TABLE archived_jobs")
        .execute(&pool)
        .await
        .unwrap();

    let outcome = ArchiveRepo::archive_job(&pool, job_id).await.unwrap();
    assert_eq!(outcome, ArchiveOutcome::StoreUnavailable);
    assert!(!outcome.archived());

    // Marked completed in place; live rows kept, nothing deleted.
    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();
    assert_eq!(job.status(), ServiceStatus::Completed);
    assert_eq!(count(&pool, "operations").await, 2);
    assert_eq!(count(&pool, "job_photos").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn transition_to_completed_goes_through_archival(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    let outcome = lifecycle::apply_transition(&pool, job_id, "Tamamlandı")
        .await
        .unwrap();
    assert_matches!(
        outcome,
        TransitionOutcome::Completed(ArchiveOutcome::Archived { .. })
    );
    assert_eq!(count(&pool, "jobs").await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn legacy_alias_also_triggers_archival(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    let outcome = lifecycle::apply_transition(&pool, job_id, "Tamamlandi")
        .await
        .unwrap();
    assert_matches!(outcome, TransitionOutcome::Completed(_));
    assert_eq!(count(&pool, "archived_jobs").await, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_label_falls_back_to_opened(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    let outcome = lifecycle::apply_transition(&pool, job_id, "Bozuk Durum")
        .await
        .unwrap();
    assert_eq!(outcome, TransitionOutcome::Updated(ServiceStatus::Opened));

    let job = JobRepo::find_by_id(&pool, job_id).await.unwrap().unwrap();
    assert_eq!(job.status(), ServiceStatus::Opened);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn valid_label_is_persisted(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;

    let outcome = lifecycle::apply_transition(&pool, job_id, "Onaylandı")
        .await
        .unwrap();
    assert_eq!(outcome, TransitionOutcome::Updated(ServiceStatus::Approved));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn archive_list_searches_tracking_and_customer(pool: PgPool) {
    let job_id = seed_full_job(&pool).await;
    ArchiveRepo::archive_job(&pool, job_id).await.unwrap();

    let by_tracking = ArchiveRepo::list(
        &pool,
        &ArchiveListQuery {
            search: Some("TS-1".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_tracking.len(), 1);

    let by_customer = ArchiveRepo::list(
        &pool,
        &ArchiveListQuery {
            search: Some("yılmaz".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(by_customer.len(), 1);

    let none = ArchiveRepo::list(
        &pool,
        &ArchiveListQuery {
            search: Some("yok".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(none.is_empty());
}
