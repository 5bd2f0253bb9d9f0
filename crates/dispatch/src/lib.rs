//! Quote dispatch: pricing a batch of jobs into one combined quote
//! artifact, sending it by email, and recording a dispatch receipt.
//!
//! Rendering and transport sit behind traits so tests can swap them out;
//! the production implementations are an HTML renderer and a `lettre`
//! SMTP transport.

pub mod coordinator;
pub mod email;
pub mod render;
pub mod storage;

pub use coordinator::{DispatchError, DispatchOutcome, DispatchRequest, QuoteDispatcher};
pub use email::{DisabledTransport, EmailConfig, EmailError, MailTransport, OutgoingMail, SmtpMailer};
pub use render::{HtmlQuoteRenderer, JobQuote, QuoteDocument, QuoteRenderer, RenderError};
pub use storage::PhotoStorage;
