//! Photo-wait signal coordination.
//!
//! A single-slot, time-boxed token that grants one unauthenticated mobile
//! caller temporary permission to attach photos to exactly one job. The
//! slot is process-wide, guarded by a single mutex so that raise / read /
//! consume sequences are linearized, and deliberately not persisted: a
//! restart clears it, which is correct for a short-lived coordination
//! token.
//!
//! Expiry is evaluated lazily on read; there is no background sweep.

use std::sync::Mutex;

use chrono::{Duration, Utc};
use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// How long a raised signal stays valid.
pub const SIGNAL_TTL_MINUTES: i64 = 30;

/// The active "awaiting photos" token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoWaitSignal {
    /// The one job currently allowed to receive unauthenticated uploads.
    pub job_id: DbId,
    pub raised_at: Timestamp,
}

impl PhotoWaitSignal {
    fn is_live(&self, now: Timestamp) -> bool {
        now - self.raised_at <= Duration::minutes(SIGNAL_TTL_MINUTES)
    }
}

/// Single-slot coordinator for the photo-wait signal.
///
/// At most one signal exists system-wide; raising for a new job
/// unconditionally supersedes the previous one.
#[derive(Debug, Default)]
pub struct PhotoWaitCoordinator {
    slot: Mutex<Option<PhotoWaitSignal>>,
}

impl PhotoWaitCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<PhotoWaitSignal>> {
        // A poisoned lock only means a panicking thread held it; the slot
        // itself is always in a valid state.
        self.slot.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark `job_id` as awaiting photos, superseding any existing signal.
    pub fn raise(&self, job_id: DbId) -> PhotoWaitSignal {
        self.raise_at(job_id, Utc::now())
    }

    fn raise_at(&self, job_id: DbId, now: Timestamp) -> PhotoWaitSignal {
        let signal = PhotoWaitSignal {
            job_id,
            raised_at: now,
        };
        *self.lock() = Some(signal);
        signal
    }

    /// Return the active signal, or `None` if the slot is empty or the
    /// signal has expired. An expired signal is cleared as a side effect.
    pub fn current(&self) -> Option<PhotoWaitSignal> {
        self.current_at(Utc::now())
    }

    fn current_at(&self, now: Timestamp) -> Option<PhotoWaitSignal> {
        let mut slot = self.lock();
        match *slot {
            Some(signal) if signal.is_live(now) => Some(signal),
            Some(_) => {
                *slot = None;
                None
            }
            None => None,
        }
    }

    /// Whether a caller may attach photos to `job_id`.
    ///
    /// Authenticated callers are always authorized. Unauthenticated
    /// callers are authorized only while the live signal matches the job.
    pub fn authorize(&self, job_id: DbId, is_authenticated: bool) -> bool {
        self.authorize_at(job_id, is_authenticated, Utc::now())
    }

    fn authorize_at(&self, job_id: DbId, is_authenticated: bool, now: Timestamp) -> bool {
        if is_authenticated {
            return true;
        }
        self.current_at(now)
            .is_some_and(|signal| signal.job_id == job_id)
    }

    /// Clear the signal after a successful upload.
    ///
    /// Only clears when the active signal still belongs to `job_id`, so a
    /// late consumer cannot wipe a signal raised for a different job in
    /// the meantime. Returns whether anything was cleared.
    pub fn consume(&self, job_id: DbId) -> bool {
        let mut slot = self.lock();
        if slot.map(|s| s.job_id) == Some(job_id) {
            *slot = None;
            true
        } else {
            false
        }
    }
}
