//! The quote dispatch coordinator.
//!
//! Prices a batch of jobs, renders one combined artifact, emails it, and
//! records a dispatch receipt. Render failure is a hard error; transport
//! failure is reported alongside the successfully produced artifact
//! rather than discarding it; receipt bookkeeping and the post-dispatch
//! status advance are best-effort per job.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use atolye_core::pricing::{self, Quote};
use atolye_core::status::ServiceStatus;
use atolye_core::types::DbId;
use atolye_db::models::dispatch_receipt::CreateDispatchReceipt;
use atolye_db::models::job::Job;
use atolye_db::models::operation::OperationDetail;
use atolye_db::repositories::{JobRepo, OperationRepo, PhotoRepo, ReceiptRepo};

use crate::email::{MailTransport, OutgoingMail};
use crate::render::{JobQuote, QuoteDocument, QuoteRenderer, RenderError};
use crate::storage::PhotoStorage;

/// A request to quote one or more jobs to a recipient list.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchRequest {
    pub job_ids: Vec<DbId>,
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
    /// Display name override for the sender.
    pub sender_name: Option<String>,
    pub general_note: Option<String>,
}

/// What a dispatch attempt produced.
///
/// The artifact and the transport outcome are reported independently: a
/// failed send still leaves a rendered artifact and a receipt.
#[derive(Debug, Serialize)]
pub struct DispatchOutcome {
    pub artifact_name: String,
    pub artifact_path: PathBuf,
    /// `None` when receipt bookkeeping itself failed (best-effort).
    pub receipt_id: Option<DbId>,
    /// Whether the transport accepted the message.
    pub sent: bool,
    pub transport_error: Option<String>,
    /// Jobs actually advanced to `ApprovalPending` (empty unless sent).
    pub advanced_jobs: Vec<DbId>,
}

/// Errors that abort a dispatch before any artifact exists.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Dispatch requires at least one job")]
    NoJobs,

    #[error("Dispatch requires at least one recipient")]
    NoRecipients,

    #[error("Job {0} not found")]
    JobNotFound(DbId),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Artifact write failed: {0}")]
    Artifact(#[from] std::io::Error),
}

/// Coordinates pricing, rendering, transport, and bookkeeping.
pub struct QuoteDispatcher {
    renderer: Arc<dyn QuoteRenderer>,
    transport: Arc<dyn MailTransport>,
    photos: PhotoStorage,
    /// Directory where rendered artifacts are written.
    artifact_dir: PathBuf,
}

impl QuoteDispatcher {
    pub fn new(
        renderer: Arc<dyn QuoteRenderer>,
        transport: Arc<dyn MailTransport>,
        photos: PhotoStorage,
        artifact_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            renderer,
            transport,
            photos,
            artifact_dir: artifact_dir.into(),
        }
    }

    /// Dispatch a combined quote for the requested jobs.
    pub async fn dispatch(
        &self,
        pool: &PgPool,
        request: &DispatchRequest,
    ) -> Result<DispatchOutcome, DispatchError> {
        if request.job_ids.is_empty() {
            return Err(DispatchError::NoJobs);
        }
        if request.to.is_empty() {
            return Err(DispatchError::NoRecipients);
        }

        // Load and price every requested job. The customer and document
        // number on the combined document come from the first job.
        let mut first: Option<Job> = None;
        let mut jobs = Vec::with_capacity(request.job_ids.len());
        for &job_id in &request.job_ids {
            let job = JobRepo::find_by_id(pool, job_id)
                .await?
                .ok_or(DispatchError::JobNotFound(job_id))?;
            let operations = OperationRepo::list_by_job(pool, job_id).await?;
            let photo_paths = self.resolve_photos(pool, &job).await?;

            jobs.push(JobQuote {
                job_id,
                tracking_no: job.tracking_no.clone(),
                product_model: job.product_model.clone(),
                quote: build_quote(&job, &operations),
                photo_paths,
            });
            first.get_or_insert(job);
        }
        // Non-empty by the guard above.
        let first = first.ok_or(DispatchError::NoJobs)?;

        let document = QuoteDocument {
            customer_name: first.customer_name.clone(),
            document_no: first.document_no.clone(),
            general_note: request.general_note.clone(),
            jobs,
        };

        // Render and persist the artifact. A render failure aborts the
        // dispatch; nothing has been recorded yet.
        let bytes = self.renderer.render(&document).await?;
        let artifact_name = format!(
            "teklif-{}-{}.{}",
            first.id,
            Utc::now().format("%Y%m%d%H%M%S"),
            self.renderer.extension(),
        );
        let artifact_path = self.artifact_dir.join(&artifact_name);
        tokio::fs::create_dir_all(&self.artifact_dir).await?;
        tokio::fs::write(&artifact_path, &bytes).await?;

        // Single transport attempt, no retry.
        let mail = OutgoingMail {
            to: request.to.clone(),
            cc: request.cc.clone(),
            bcc: request.bcc.clone(),
            subject: format!("Servis Teklifi - {}", first.customer_name),
            html_body: String::from_utf8_lossy(&bytes).into_owned(),
            attachment: Some(artifact_path.clone()),
            sender_name: request.sender_name.clone(),
        };
        let (sent, transport_error) = match self.transport.send(&mail).await {
            Ok(()) => (true, None),
            Err(err) => {
                tracing::warn!(error = %err, "Quote transport failed; artifact kept");
                (false, Some(err.to_string()))
            }
        };

        // The receipt is recorded regardless of transport outcome; its
        // own failure is logged and skipped.
        let receipt_id = match ReceiptRepo::record(
            pool,
            &CreateDispatchReceipt {
                recipient: request.to.join(", "),
                document_no: first.document_no.clone(),
                artifact_name: artifact_name.clone(),
                job_ids: request.job_ids.clone(),
                customer_name: first.customer_name.clone(),
                sender_name: request.sender_name.clone(),
            },
        )
        .await
        {
            Ok(receipt) => Some(receipt.id),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to record dispatch receipt");
                None
            }
        };

        // Quoting is complete once sent: advance every included job.
        // Per-job failures do not abort the batch.
        let mut advanced_jobs = Vec::new();
        if sent {
            for &job_id in &request.job_ids {
                match JobRepo::set_status(pool, job_id, ServiceStatus::ApprovalPending).await {
                    Ok(true) => advanced_jobs.push(job_id),
                    Ok(false) => {
                        tracing::warn!(job_id, "Job vanished before post-dispatch advance")
                    }
                    Err(err) => {
                        tracing::warn!(job_id, error = %err, "Post-dispatch advance failed")
                    }
                }
            }
        }

        tracing::info!(
            jobs = request.job_ids.len(),
            artifact = %artifact_name,
            sent,
            "Quote dispatched",
        );

        Ok(DispatchOutcome {
            artifact_name,
            artifact_path,
            receipt_id,
            sent,
            transport_error,
            advanced_jobs,
        })
    }

    /// Resolve a job's photo references against storage. Unresolvable
    /// photos are warn-logged and omitted, never an error.
    async fn resolve_photos(&self, pool: &PgPool, job: &Job) -> Result<Vec<PathBuf>, sqlx::Error> {
        let mut paths = Vec::new();
        for photo in PhotoRepo::list_by_job(pool, job.id).await? {
            match self.photos.resolve(&photo.rel_path) {
                Some(path) => paths.push(path),
                None => tracing::warn!(
                    job_id = job.id,
                    rel_path = %photo.rel_path,
                    "Photo file missing; omitted from dispatch",
                ),
            }
        }
        Ok(paths)
    }
}

/// Price one job: its worksheets when work is logged, otherwise the
/// intake estimates.
fn build_quote(job: &Job, operations: &[OperationDetail]) -> Quote {
    if operations.is_empty() {
        Quote {
            lines: Vec::new(),
            totals: pricing::price_estimates(
                job.parts_estimate.unwrap_or(0.0),
                job.services_estimate.unwrap_or(0.0),
            ),
        }
    } else {
        let sheets: Vec<_> = operations.iter().map(|d| d.worksheet()).collect();
        pricing::price_worksheets(&sheets)
    }
}
