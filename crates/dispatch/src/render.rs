//! Quote artifact rendering.
//!
//! [`QuoteRenderer`] is the seam towards the document generator; the
//! shipped implementation produces a single self-contained HTML file
//! covering every job in the batch. PDF generation is out of scope.

use std::path::PathBuf;

use async_trait::async_trait;

use atolye_core::pricing::Quote;
use atolye_core::types::DbId;

/// Error type for artifact rendering failures.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Rendering failed: {0}")]
    Failed(String),
}

/// One job's priced contribution to the combined quote document.
#[derive(Debug, Clone)]
pub struct JobQuote {
    pub job_id: DbId,
    pub tracking_no: String,
    pub product_model: String,
    pub quote: Quote,
    /// Resolved photo paths; unresolvable photos were already dropped.
    pub photo_paths: Vec<PathBuf>,
}

/// The combined line-item model handed to the renderer.
#[derive(Debug, Clone)]
pub struct QuoteDocument {
    pub customer_name: String,
    pub document_no: String,
    pub general_note: Option<String>,
    pub jobs: Vec<JobQuote>,
}

impl QuoteDocument {
    /// Grand total across all jobs in the batch.
    pub fn batch_total(&self) -> f64 {
        self.jobs.iter().map(|j| j.quote.totals.grand_total).sum()
    }
}

/// Renderer seam. A single fallible call producing the artifact bytes.
#[async_trait]
pub trait QuoteRenderer: Send + Sync {
    async fn render(&self, document: &QuoteDocument) -> Result<Vec<u8>, RenderError>;

    /// File extension of the produced artifact (used to name it).
    fn extension(&self) -> &'static str;
}

/// Renders the quote as a self-contained HTML document.
#[derive(Debug, Default)]
pub struct HtmlQuoteRenderer;

/// Minimal HTML escaping for user-entered text.
fn escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[async_trait]
impl QuoteRenderer for HtmlQuoteRenderer {
    async fn render(&self, document: &QuoteDocument) -> Result<Vec<u8>, RenderError> {
        let mut html = String::with_capacity(4096);
        html.push_str("<!DOCTYPE html><html lang=\"tr\"><head><meta charset=\"utf-8\">");
        html.push_str("<title>Servis Teklifi</title></head><body>");
        html.push_str(&format!(
            "<h1>Servis Teklifi</h1><p>Sayın {}</p><p>Belge No: {}</p>",
            escape(&document.customer_name),
            escape(&document.document_no),
        ));

        for job in &document.jobs {
            html.push_str(&format!(
                "<h2>{} — {}</h2>",
                escape(&job.tracking_no),
                escape(&job.product_model),
            ));
            html.push_str(
                "<table border=\"1\" cellspacing=\"0\" cellpadding=\"4\">\
                 <tr><th>Açıklama</th><th>Adet</th><th>Birim Fiyat</th><th>Tutar</th></tr>",
            );
            for line in &job.quote.lines {
                html.push_str(&format!(
                    "<tr><td>{}</td><td>{}</td><td>{:.2}</td><td>{:.2}</td></tr>",
                    escape(&line.description),
                    line.quantity,
                    line.unit_price,
                    line.line_total,
                ));
            }
            let totals = &job.quote.totals;
            html.push_str(&format!(
                "<tr><td colspan=\"3\">Ara Toplam</td><td>{:.2}</td></tr>\
                 <tr><td colspan=\"3\">KDV</td><td>{:.2}</td></tr>\
                 <tr><td colspan=\"3\"><b>Genel Toplam</b></td><td><b>{:.2}</b></td></tr>\
                 </table>",
                totals.subtotal, totals.tax, totals.grand_total,
            ));
        }

        if document.jobs.len() > 1 {
            html.push_str(&format!(
                "<p><b>Toplam ({} iş): {:.2}</b></p>",
                document.jobs.len(),
                document.batch_total(),
            ));
        }

        if let Some(note) = &document.general_note {
            html.push_str(&format!("<p>{}</p>", escape(note)));
        }

        html.push_str("</body></html>");
        Ok(html.into_bytes())
    }

    fn extension(&self) -> &'static str {
        "html"
    }
}
