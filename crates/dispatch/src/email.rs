//! Quote email transport via SMTP.
//!
//! [`SmtpMailer`] wraps the `lettre` async SMTP transport. Configuration
//! is loaded from environment variables; if `SMTP_HOST` is not set,
//! [`EmailConfig::from_env`] returns `None` and no mailer should be
//! constructed.

use std::path::PathBuf;

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The attachment could not be read from disk.
    #[error("Attachment read error: {0}")]
    Attachment(#[from] std::io::Error),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "servis@atolye.local";

/// Configuration for the SMTP quote transport.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// dispatch is not configured.
    ///
    /// | Variable        | Required | Default                 |
    /// |-----------------|----------|-------------------------|
    /// | `SMTP_HOST`     | yes      | —                       |
    /// | `SMTP_PORT`     | no       | `587`                   |
    /// | `SMTP_FROM`     | no       | `servis@atolye.local`   |
    /// | `SMTP_USER`     | no       | —                       |
    /// | `SMTP_PASSWORD` | no       | —                       |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

// ---------------------------------------------------------------------------
// MailTransport
// ---------------------------------------------------------------------------

/// One outgoing quote email.
#[derive(Debug, Clone)]
pub struct OutgoingMail {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub bcc: Vec<String>,
    pub subject: String,
    pub html_body: String,
    /// Path of the rendered quote artifact to attach.
    pub attachment: Option<PathBuf>,
    /// Display name override for the sender.
    pub sender_name: Option<String>,
}

/// Transport seam for quote dispatch. A single fallible call; the
/// coordinator does not retry.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), EmailError>;
}

// ---------------------------------------------------------------------------
// SmtpMailer
// ---------------------------------------------------------------------------

/// Sends quote emails via SMTP.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    /// Create a new mailer with the given configuration.
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), EmailError> {
        use lettre::message::header::ContentType;
        use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
        use lettre::transport::smtp::authentication::Credentials;
        use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

        let from_address = self.config.from_address.parse()?;
        let from = Mailbox::new(mail.sender_name.clone(), from_address);

        let mut builder = Message::builder().from(from).subject(mail.subject.clone());
        for to in &mail.to {
            builder = builder.to(to.parse()?);
        }
        for cc in &mail.cc {
            builder = builder.cc(cc.parse()?);
        }
        for bcc in &mail.bcc {
            builder = builder.bcc(bcc.parse()?);
        }

        let body = SinglePart::builder()
            .header(ContentType::TEXT_HTML)
            .body(mail.html_body.clone());

        let message = match &mail.attachment {
            Some(path) => {
                let bytes = tokio::fs::read(path).await?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "teklif.html".to_string());
                let attachment =
                    Attachment::new(file_name).body(bytes, ContentType::TEXT_HTML);
                builder
                    .multipart(MultiPart::mixed().singlepart(body).singlepart(attachment))
                    .map_err(|e| EmailError::Build(e.to_string()))?
            }
            None => builder
                .singlepart(body)
                .map_err(|e| EmailError::Build(e.to_string()))?,
        };

        let mut transport =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(password)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport = transport.credentials(Credentials::new(user.clone(), password.clone()));
        }

        transport.build().send(message).await?;
        Ok(())
    }
}

/// Stand-in transport for deployments without SMTP settings.
///
/// Every send fails with a clear message, which the coordinator reports
/// through the usual "artifact kept, transport failed" path.
pub struct DisabledTransport;

#[async_trait]
impl MailTransport for DisabledTransport {
    async fn send(&self, _mail: &OutgoingMail) -> Result<(), EmailError> {
        Err(EmailError::Build(
            "SMTP transport is not configured (SMTP_HOST unset)".to_string(),
        ))
    }
}
