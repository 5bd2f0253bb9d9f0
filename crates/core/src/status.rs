//! Service job lifecycle statuses.
//!
//! The status set is a closed enumeration mapping to the `jobs.status_id`
//! SMALLINT column (1-based, matching the seed order in the migration).
//! Display labels are the original product's Turkish strings and are
//! matched exactly (case- and diacritic-sensitive); the only accepted
//! legacy spelling is "Tamamlandi", which older clients sent without the
//! dotless i and which normalizes to [`ServiceStatus::Completed`].

use serde::{Deserialize, Serialize};

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Legacy diacritic-free alias still sent by old mobile clients.
const LEGACY_COMPLETED_ALIAS: &str = "Tamamlandi";

/// Lifecycle status of a service job, ordered by normal workflow.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// Job recorded at intake, no billable work logged yet.
    Opened = 1,
    /// Work has been logged; a quote needs to be produced.
    QuotePending = 2,
    /// Quote sent to the customer, awaiting approval.
    ApprovalPending = 3,
    /// Customer approved the quote.
    Approved = 4,
    /// Repair under way.
    InProgress = 5,
    /// Terminal. A transition to this status triggers archival.
    Completed = 6,
}

impl ServiceStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Reconstruct a status from its database ID.
    ///
    /// Unknown IDs fall back to [`ServiceStatus::Opened`], mirroring the
    /// string-side safe default.
    pub fn from_id(id: StatusId) -> Self {
        match id {
            2 => Self::QuotePending,
            3 => Self::ApprovalPending,
            4 => Self::Approved,
            5 => Self::InProgress,
            6 => Self::Completed,
            _ => Self::Opened,
        }
    }

    /// The canonical display label (exact wire representation).
    pub fn label(self) -> &'static str {
        match self {
            Self::Opened => "Açıldı",
            Self::QuotePending => "Teklif Bekliyor",
            Self::ApprovalPending => "Onay Bekliyor",
            Self::Approved => "Onaylandı",
            Self::InProgress => "İşlemde",
            Self::Completed => "Tamamlandı",
        }
    }

    /// Validate a status label against the closed set.
    ///
    /// Matching is exact except for the single enumerated legacy alias.
    /// Returns `None` for anything else; callers that need the defensive
    /// default should use [`ServiceStatus::parse_or_default`].
    pub fn from_label(label: &str) -> Option<Self> {
        if label == LEGACY_COMPLETED_ALIAS {
            return Some(Self::Completed);
        }
        [
            Self::Opened,
            Self::QuotePending,
            Self::ApprovalPending,
            Self::Approved,
            Self::InProgress,
            Self::Completed,
        ]
        .into_iter()
        .find(|s| s.label() == label)
    }

    /// Parse a status label, falling back to [`ServiceStatus::Opened`].
    ///
    /// Stale or hand-edited client payloads are silently corrected to
    /// the safe default rather than surfaced as errors.
    pub fn parse_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Self::Opened)
    }

    /// Whether this status ends the live lifecycle.
    pub fn is_terminal(self) -> bool {
        self == Self::Completed
    }
}

impl From<ServiceStatus> for StatusId {
    fn from(value: ServiceStatus) -> Self {
        value as StatusId
    }
}

/// Named lifecycle events that force a status, independent of the
/// requested-transition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusEvent {
    /// Billable work was logged against the job. Always means "this job
    /// now needs a quote", overriding any stale status.
    OperationLogged,
}

impl StatusEvent {
    /// The status a job is forced into when this event occurs.
    pub fn forced_status(self) -> ServiceStatus {
        match self {
            Self::OperationLogged => ServiceStatus::QuotePending,
        }
    }
}
